//! The closed event catalogue.
//!
//! Every event type is declared exactly once in the `event_catalogue!`
//! invocation below, together with its namespaced wire name, its business
//! module, and the payload record it carries. From that single table the
//! macro generates both the fieldless [`EventType`] used for subscriptions,
//! rule triggers and agent triggers, and the tagged [`EventPayload`] union
//! that publishers construct. Because the type of an event is derived from
//! its payload variant, an event whose type and payload disagree cannot be
//! built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::event::BusinessModule;
use crate::payload::{
    ClientPayload, ExpensePayload, InvoicePayload, LeadPayload, OpportunityPayload,
    PaymentPayload, ProductPayload, ProjectPayload, QuotePayload, StockMovementPayload,
    TaskPayload, TimeEntryPayload,
};

macro_rules! event_catalogue {
    ($(
        $(#[$doc:meta])*
        $variant:ident($payload:ty) => $name:literal, $module:ident;
    )+) => {
        /// Namespaced event type, one per catalogue entry.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum EventType {
            $(
                $(#[$doc])*
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl EventType {
            /// Every event type in catalogue order.
            pub const ALL: &'static [EventType] = &[$(EventType::$variant),+];

            /// Returns the namespaced wire name, e.g. `sales.quote.approved`.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(EventType::$variant => $name,)+
                }
            }

            /// Returns the business module this event type belongs to.
            #[must_use]
            pub const fn module(self) -> BusinessModule {
                match self {
                    $(EventType::$variant => BusinessModule::$module,)+
                }
            }
        }

        /// Typed event payload, tagged by event type.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type", content = "data")]
        pub enum EventPayload {
            $(
                $(#[$doc])*
                #[serde(rename = $name)]
                $variant($payload),
            )+
        }

        impl EventPayload {
            /// Returns the event type this payload variant belongs to.
            #[must_use]
            pub const fn event_type(&self) -> EventType {
                match self {
                    $(EventPayload::$variant(_) => EventType::$variant,)+
                }
            }
        }
    };
}

event_catalogue! {
    /// A new sales lead was captured.
    LeadCreated(LeadPayload) => "sales.lead.created", Sales;
    /// A lead was qualified and converted.
    LeadConverted(LeadPayload) => "sales.lead.converted", Sales;
    /// A sales opportunity was opened.
    OpportunityCreated(OpportunityPayload) => "sales.opportunity.created", Sales;
    /// An opportunity closed as won.
    OpportunityWon(OpportunityPayload) => "sales.opportunity.won", Sales;
    /// An opportunity closed as lost.
    OpportunityLost(OpportunityPayload) => "sales.opportunity.lost", Sales;
    /// A quote was drafted.
    QuoteCreated(QuotePayload) => "sales.quote.created", Sales;
    /// A quote was sent to the client.
    QuoteSent(QuotePayload) => "sales.quote.sent", Sales;
    /// The client approved a quote.
    QuoteApproved(QuotePayload) => "sales.quote.approved", Sales;
    /// The client rejected a quote.
    QuoteRejected(QuotePayload) => "sales.quote.rejected", Sales;

    /// An invoice was issued.
    InvoiceCreated(InvoicePayload) => "finance.invoice.created", Finance;
    /// An invoice was sent to the client.
    InvoiceSent(InvoicePayload) => "finance.invoice.sent", Finance;
    /// An invoice was paid in full.
    InvoicePaid(InvoicePayload) => "finance.invoice.paid", Finance;
    /// An invoice passed its due date unpaid.
    InvoiceOverdue(InvoicePayload) => "finance.invoice.overdue", Finance;
    /// An expense was recorded.
    ExpenseCreated(ExpensePayload) => "finance.expense.created", Finance;
    /// An expense was approved.
    ExpenseApproved(ExpensePayload) => "finance.expense.approved", Finance;
    /// A payment was received.
    PaymentReceived(PaymentPayload) => "finance.payment.received", Finance;

    /// A product was added to the catalogue.
    ProductCreated(ProductPayload) => "inventory.product.created", Inventory;
    /// A product fell to or below its reorder level.
    ProductLowStock(ProductPayload) => "inventory.product.lowStock", Inventory;
    /// A product ran out of stock.
    ProductOutOfStock(ProductPayload) => "inventory.product.outOfStock", Inventory;
    /// Stock moved in or out of a warehouse.
    StockMoved(StockMovementPayload) => "inventory.stock.moved", Inventory;

    /// A project was created.
    ProjectCreated(ProjectPayload) => "projects.project.created", Projects;
    /// A project was completed.
    ProjectCompleted(ProjectPayload) => "projects.project.completed", Projects;
    /// A project slipped past its planned date.
    ProjectDelayed(ProjectPayload) => "projects.project.delayed", Projects;
    /// A task was created.
    TaskCreated(TaskPayload) => "projects.task.created", Projects;
    /// A task was completed.
    TaskCompleted(TaskPayload) => "projects.task.completed", Projects;
    /// A task passed its due date.
    TaskOverdue(TaskPayload) => "projects.task.overdue", Projects;

    /// A client record was created.
    ClientCreated(ClientPayload) => "clients.client.created", Clients;
    /// A client record was updated.
    ClientUpdated(ClientPayload) => "clients.client.updated", Clients;

    /// An employee logged time.
    TimeEntryLogged(TimeEntryPayload) => "hr.timeEntry.logged", Hr;
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|event_type| event_type.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown event type: {s}")))
    }
}
