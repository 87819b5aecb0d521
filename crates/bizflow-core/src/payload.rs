//! Typed payload records carried by catalogue events.
//!
//! Monetary amounts are integer minor units (cents) with an ISO 4217
//! currency code alongside.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload for lead lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadPayload {
    /// The lead identifier.
    pub lead_id: Uuid,
    /// The client the lead belongs to, once known.
    pub client_id: Option<Uuid>,
    /// Contact or company name.
    pub name: String,
    /// Estimated deal value in minor units.
    pub estimated_value_cents: Option<i64>,
}

/// Payload for opportunity lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityPayload {
    /// The opportunity identifier.
    pub opportunity_id: Uuid,
    /// The client the opportunity is for.
    pub client_id: Option<Uuid>,
    /// The lead this opportunity was converted from.
    pub lead_id: Option<Uuid>,
    /// Short title of the deal.
    pub title: String,
    /// Deal value in minor units.
    pub value_cents: i64,
}

/// Payload for quote lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePayload {
    /// The quote identifier.
    pub quote_id: Uuid,
    /// The client the quote was issued to.
    pub client_id: Uuid,
    /// The opportunity the quote belongs to.
    pub opportunity_id: Option<Uuid>,
    /// Quote total in minor units.
    pub total_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Payload for invoice lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePayload {
    /// The invoice identifier.
    pub invoice_id: Uuid,
    /// The billed client.
    pub client_id: Uuid,
    /// The quote this invoice was raised from.
    pub quote_id: Option<Uuid>,
    /// Invoice amount in minor units.
    pub amount_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
}

/// Payload for expense events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpensePayload {
    /// The expense identifier.
    pub expense_id: Uuid,
    /// Expense category, e.g. `travel`.
    pub category: String,
    /// Amount in minor units.
    pub amount_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Project the expense is booked against.
    pub project_id: Option<Uuid>,
}

/// Payload for received payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPayload {
    /// The payment identifier.
    pub payment_id: Uuid,
    /// The invoice being settled, if any.
    pub invoice_id: Option<Uuid>,
    /// The paying client.
    pub client_id: Uuid,
    /// Amount in minor units.
    pub amount_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Payload for product and stock level events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPayload {
    /// The product identifier.
    pub product_id: Uuid,
    /// Stock keeping unit.
    pub sku: String,
    /// Product name.
    pub name: String,
    /// Units currently on hand.
    pub quantity_on_hand: i64,
    /// Level at or below which the product should be reordered.
    pub reorder_level: i64,
}

/// Payload for stock movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovementPayload {
    /// The product that moved.
    pub product_id: Uuid,
    /// Signed change in units (negative for outbound).
    pub quantity_delta: i64,
    /// Why the stock moved, e.g. `sale` or `restock`.
    pub reason: String,
    /// Warehouse the movement happened in.
    pub warehouse: Option<String>,
}

/// Payload for project lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPayload {
    /// The project identifier.
    pub project_id: Uuid,
    /// The client the project is delivered for.
    pub client_id: Option<Uuid>,
    /// The won opportunity that started the project.
    pub opportunity_id: Option<Uuid>,
    /// Project name.
    pub name: String,
    /// Planned delivery date.
    pub due_date: Option<NaiveDate>,
}

/// Payload for task lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    /// The task identifier.
    pub task_id: Uuid,
    /// The owning project.
    pub project_id: Uuid,
    /// Task title.
    pub title: String,
    /// Assigned employee.
    pub assignee_id: Option<Uuid>,
    /// Task due date.
    pub due_date: Option<NaiveDate>,
}

/// Payload for client record events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPayload {
    /// The client identifier.
    pub client_id: Uuid,
    /// Client display name.
    pub name: String,
    /// Primary contact email.
    pub email: Option<String>,
}

/// Payload for HR time tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryPayload {
    /// The time entry identifier.
    pub entry_id: Uuid,
    /// The employee who logged the time.
    pub employee_id: Uuid,
    /// Project the time is booked against.
    pub project_id: Option<Uuid>,
    /// Minutes worked.
    pub minutes: u32,
    /// Day the work was performed.
    pub work_date: NaiveDate,
}
