//! The built-in agent set.

use bizflow_core::catalogue::EventType;

use crate::domain::agent::AgentDefinition;

/// Model used by the built-in agents.
pub const DEFAULT_AGENT_MODEL: &str = "gpt-4o-mini";

/// Builds the built-in agents in table order: sales, finance, inventory,
/// projects, client relationship.
#[must_use]
pub fn default_agents() -> Vec<AgentDefinition> {
    vec![
        AgentDefinition::new(
            "sales-agent",
            "Sales Agent",
            "Tracks the pipeline from lead to approved quote",
            DEFAULT_AGENT_MODEL,
            vec![
                EventType::LeadCreated,
                EventType::LeadConverted,
                EventType::OpportunityCreated,
                EventType::OpportunityWon,
                EventType::OpportunityLost,
                EventType::QuoteCreated,
                EventType::QuoteSent,
                EventType::QuoteApproved,
                EventType::QuoteRejected,
            ],
            "You are a sales operations analyst for a small business. Assess how each \
             pipeline event affects revenue forecasts and conversion, and recommend concrete \
             follow-ups for the sales team.",
        ),
        AgentDefinition::new(
            "finance-agent",
            "Finance Agent",
            "Watches invoicing, expenses and cash flow",
            DEFAULT_AGENT_MODEL,
            vec![
                EventType::InvoiceCreated,
                EventType::InvoiceSent,
                EventType::InvoicePaid,
                EventType::InvoiceOverdue,
                EventType::ExpenseCreated,
                EventType::ExpenseApproved,
                EventType::PaymentReceived,
            ],
            "You are a financial controller. Evaluate each finance event for its effect on \
             cash flow and receivables, flag risks such as late payment or unusual spend, and \
             suggest corrective actions.",
        ),
        AgentDefinition::new(
            "inventory-agent",
            "Inventory Agent",
            "Monitors stock levels and movements",
            DEFAULT_AGENT_MODEL,
            vec![
                EventType::ProductCreated,
                EventType::ProductLowStock,
                EventType::ProductOutOfStock,
                EventType::StockMoved,
            ],
            "You are an inventory planner. Judge whether stock levels can meet demand, \
             recommend reorder quantities and timing, and point out unusual stock movements.",
        ),
        AgentDefinition::new(
            "projects-agent",
            "Projects Agent",
            "Follows project delivery, tasks and logged time",
            DEFAULT_AGENT_MODEL,
            vec![
                EventType::ProjectCreated,
                EventType::ProjectCompleted,
                EventType::ProjectDelayed,
                EventType::TaskCreated,
                EventType::TaskCompleted,
                EventType::TaskOverdue,
                EventType::TimeEntryLogged,
            ],
            "You are a delivery manager. Assess schedule and workload risk from each project \
             event and recommend actions that keep delivery on track.",
        ),
        AgentDefinition::new(
            "client-relationship-agent",
            "Client Relationship Agent",
            "Looks after client health across sales, billing and delivery",
            DEFAULT_AGENT_MODEL,
            vec![
                EventType::ClientCreated,
                EventType::ClientUpdated,
                EventType::OpportunityLost,
                EventType::InvoicePaid,
                EventType::InvoiceOverdue,
                EventType::ProjectCompleted,
                EventType::ProjectDelayed,
            ],
            "You are an account manager. Read each event for what it says about the client \
             relationship, estimate satisfaction and churn risk, and suggest how to engage the \
             client next.",
        ),
    ]
}
