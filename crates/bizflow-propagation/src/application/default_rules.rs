//! The default propagation rule table.
//!
//! Three rules derive new events (quote → invoice, won opportunity →
//! project, converted lead → opportunity); three record an entity change
//! through the mutation sink and publish nothing.

use std::sync::Arc;

use async_trait::async_trait;
use bizflow_core::catalogue::{EventPayload, EventType};
use bizflow_core::error::DomainError;
use bizflow_core::event::{BusinessModule, Event, PublishOptions};
use bizflow_core::mutation::{EntityAction, EntityChange, MutationSink};
use bizflow_core::payload::{InvoicePayload, OpportunityPayload, ProjectPayload};
use bizflow_event_bus::Cascade;
use chrono::Days;
use serde_json::json;
use uuid::Uuid;

use crate::domain::results::AffectedEntity;
use crate::domain::rules::{PropagationRule, RuleAction, RuleError};

/// Source tag on events published by propagation rules.
pub const PROPAGATION_SOURCE: &str = "propagation";

/// Payment term applied to invoices raised from approved quotes.
pub const INVOICE_PAYMENT_TERM_DAYS: u64 = 30;

/// Rule id: approved quote raises an invoice.
pub const QUOTE_APPROVED_CREATES_INVOICE: &str = "quote-approved-creates-invoice";
/// Rule id: won opportunity starts a project.
pub const OPPORTUNITY_WON_CREATES_PROJECT: &str = "opportunity-won-creates-project";
/// Rule id: paid invoice updates the client record.
pub const INVOICE_PAID_UPDATES_CLIENT: &str = "invoice-paid-updates-client";
/// Rule id: low stock raises an alert.
pub const PRODUCT_LOW_STOCK_RAISES_ALERT: &str = "product-low-stock-raises-alert";
/// Rule id: converted lead opens an opportunity.
pub const LEAD_CONVERTED_CREATES_OPPORTUNITY: &str = "lead-converted-creates-opportunity";
/// Rule id: delayed project notifies the team.
pub const PROJECT_DELAYED_NOTIFIES_TEAM: &str = "project-delayed-notifies-team";

/// Builds the default rule table in dispatch order.
#[must_use]
pub fn default_rules(mutations: &Arc<dyn MutationSink>) -> Vec<PropagationRule> {
    vec![
        PropagationRule::new(
            QUOTE_APPROVED_CREATES_INVOICE,
            "Approved quote creates invoice",
            EventType::QuoteApproved,
            vec![BusinessModule::Finance, BusinessModule::Sales],
            CreateInvoiceFromQuote,
        ),
        PropagationRule::new(
            OPPORTUNITY_WON_CREATES_PROJECT,
            "Won opportunity creates project",
            EventType::OpportunityWon,
            vec![BusinessModule::Projects, BusinessModule::Sales],
            CreateProjectFromOpportunity,
        ),
        PropagationRule::new(
            INVOICE_PAID_UPDATES_CLIENT,
            "Paid invoice updates client",
            EventType::InvoicePaid,
            vec![BusinessModule::Finance, BusinessModule::Clients],
            UpdateClientOnPayment {
                mutations: Arc::clone(mutations),
            },
        ),
        PropagationRule::new(
            PRODUCT_LOW_STOCK_RAISES_ALERT,
            "Low stock raises alert",
            EventType::ProductLowStock,
            vec![BusinessModule::Inventory],
            AlertOnLowStock {
                mutations: Arc::clone(mutations),
            },
        ),
        PropagationRule::new(
            LEAD_CONVERTED_CREATES_OPPORTUNITY,
            "Converted lead creates opportunity",
            EventType::LeadConverted,
            vec![BusinessModule::Sales],
            CreateOpportunityFromLead,
        ),
        PropagationRule::new(
            PROJECT_DELAYED_NOTIFIES_TEAM,
            "Delayed project notifies team",
            EventType::ProjectDelayed,
            vec![BusinessModule::Projects],
            NotifyOnProjectDelay {
                mutations: Arc::clone(mutations),
            },
        ),
    ]
}

/// Publish options for an event derived from `trigger`: same tenant and
/// user, tagged with the rule that produced it.
fn derived_options(trigger: &Event, rule_id: &str) -> PublishOptions {
    let mut options =
        PublishOptions::from_source(PROPAGATION_SOURCE).with_metadata("rule_id", json!(rule_id));
    options.user_id = trigger.user_id;
    options.tenant_id = trigger.tenant_id;
    options
}

fn unexpected(expected: EventType, event: &Event) -> DomainError {
    DomainError::UnexpectedPayload {
        expected,
        actual: event.event_type(),
    }
}

/// Applies `change` and returns it as an affected entity.
async fn apply(
    mutations: &dyn MutationSink,
    change: EntityChange,
) -> Result<AffectedEntity, DomainError> {
    mutations.apply(&change).await?;
    Ok(AffectedEntity::from(&change))
}

struct CreateInvoiceFromQuote;

#[async_trait]
impl RuleAction for CreateInvoiceFromQuote {
    async fn execute(
        &self,
        event: &Event,
        cascade: &Cascade<'_>,
    ) -> Result<Vec<AffectedEntity>, RuleError> {
        let EventPayload::QuoteApproved(quote) = &event.payload else {
            return Err(unexpected(EventType::QuoteApproved, event).into());
        };

        let invoice = InvoicePayload {
            invoice_id: Uuid::new_v4(),
            client_id: quote.client_id,
            quote_id: Some(quote.quote_id),
            amount_cents: quote.total_cents,
            currency: quote.currency.clone(),
            due_date: event
                .timestamp
                .date_naive()
                .checked_add_days(Days::new(INVOICE_PAYMENT_TERM_DAYS)),
        };
        let invoice_id = invoice.invoice_id;
        cascade
            .publish(
                EventPayload::InvoiceCreated(invoice),
                derived_options(event, QUOTE_APPROVED_CREATES_INVOICE),
            )
            .await?;

        Ok(vec![
            AffectedEntity::new(
                BusinessModule::Finance,
                "invoice",
                invoice_id,
                EntityAction::Created,
            ),
            AffectedEntity::new(
                BusinessModule::Sales,
                "quote",
                quote.quote_id,
                EntityAction::Updated,
            ),
        ])
    }
}

struct CreateProjectFromOpportunity;

#[async_trait]
impl RuleAction for CreateProjectFromOpportunity {
    async fn execute(
        &self,
        event: &Event,
        cascade: &Cascade<'_>,
    ) -> Result<Vec<AffectedEntity>, RuleError> {
        let EventPayload::OpportunityWon(opportunity) = &event.payload else {
            return Err(unexpected(EventType::OpportunityWon, event).into());
        };

        let project = ProjectPayload {
            project_id: Uuid::new_v4(),
            client_id: opportunity.client_id,
            opportunity_id: Some(opportunity.opportunity_id),
            name: opportunity.title.clone(),
            due_date: None,
        };
        let project_id = project.project_id;
        cascade
            .publish(
                EventPayload::ProjectCreated(project),
                derived_options(event, OPPORTUNITY_WON_CREATES_PROJECT),
            )
            .await?;

        Ok(vec![
            AffectedEntity::new(
                BusinessModule::Projects,
                "project",
                project_id,
                EntityAction::Created,
            ),
            AffectedEntity::new(
                BusinessModule::Sales,
                "opportunity",
                opportunity.opportunity_id,
                EntityAction::Updated,
            ),
        ])
    }
}

struct UpdateClientOnPayment {
    mutations: Arc<dyn MutationSink>,
}

#[async_trait]
impl RuleAction for UpdateClientOnPayment {
    async fn execute(
        &self,
        event: &Event,
        _cascade: &Cascade<'_>,
    ) -> Result<Vec<AffectedEntity>, RuleError> {
        let EventPayload::InvoicePaid(invoice) = &event.payload else {
            return Err(unexpected(EventType::InvoicePaid, event).into());
        };

        let settled = apply(
            self.mutations.as_ref(),
            EntityChange {
                module: BusinessModule::Finance,
                entity_type: "invoice".into(),
                entity_id: invoice.invoice_id,
                action: EntityAction::Updated,
                details: json!({ "status": "paid", "paid_at": event.timestamp }),
            },
        )
        .await?;
        let client = match apply(
            self.mutations.as_ref(),
            EntityChange {
                module: BusinessModule::Clients,
                entity_type: "client".into(),
                entity_id: invoice.client_id,
                action: EntityAction::Updated,
                details: json!({
                    "invoice_id": invoice.invoice_id,
                    "amount_paid_cents": invoice.amount_cents,
                    "currency": invoice.currency,
                }),
            },
        )
        .await
        {
            Ok(client) => client,
            Err(err) => return Err(RuleError::after(err, vec![settled])),
        };

        Ok(vec![settled, client])
    }
}

struct AlertOnLowStock {
    mutations: Arc<dyn MutationSink>,
}

#[async_trait]
impl RuleAction for AlertOnLowStock {
    async fn execute(
        &self,
        event: &Event,
        _cascade: &Cascade<'_>,
    ) -> Result<Vec<AffectedEntity>, RuleError> {
        let EventPayload::ProductLowStock(product) = &event.payload else {
            return Err(unexpected(EventType::ProductLowStock, event).into());
        };

        let shortfall = product
            .reorder_level
            .saturating_sub(product.quantity_on_hand)
            .max(0);
        let alert = apply(
            self.mutations.as_ref(),
            EntityChange {
                module: BusinessModule::Inventory,
                entity_type: "product".into(),
                entity_id: product.product_id,
                action: EntityAction::Alerted,
                details: json!({
                    "sku": product.sku,
                    "quantity_on_hand": product.quantity_on_hand,
                    "reorder_level": product.reorder_level,
                    "shortfall": shortfall,
                }),
            },
        )
        .await?;

        Ok(vec![alert])
    }
}

struct CreateOpportunityFromLead;

#[async_trait]
impl RuleAction for CreateOpportunityFromLead {
    async fn execute(
        &self,
        event: &Event,
        cascade: &Cascade<'_>,
    ) -> Result<Vec<AffectedEntity>, RuleError> {
        let EventPayload::LeadConverted(lead) = &event.payload else {
            return Err(unexpected(EventType::LeadConverted, event).into());
        };

        let opportunity = OpportunityPayload {
            opportunity_id: Uuid::new_v4(),
            client_id: lead.client_id,
            lead_id: Some(lead.lead_id),
            title: lead.name.clone(),
            value_cents: lead.estimated_value_cents.unwrap_or(0),
        };
        let opportunity_id = opportunity.opportunity_id;
        cascade
            .publish(
                EventPayload::OpportunityCreated(opportunity),
                derived_options(event, LEAD_CONVERTED_CREATES_OPPORTUNITY),
            )
            .await?;

        Ok(vec![
            AffectedEntity::new(
                BusinessModule::Sales,
                "opportunity",
                opportunity_id,
                EntityAction::Created,
            ),
            AffectedEntity::new(
                BusinessModule::Sales,
                "lead",
                lead.lead_id,
                EntityAction::Updated,
            ),
        ])
    }
}

struct NotifyOnProjectDelay {
    mutations: Arc<dyn MutationSink>,
}

#[async_trait]
impl RuleAction for NotifyOnProjectDelay {
    async fn execute(
        &self,
        event: &Event,
        _cascade: &Cascade<'_>,
    ) -> Result<Vec<AffectedEntity>, RuleError> {
        let EventPayload::ProjectDelayed(project) = &event.payload else {
            return Err(unexpected(EventType::ProjectDelayed, event).into());
        };

        let notice = apply(
            self.mutations.as_ref(),
            EntityChange {
                module: BusinessModule::Projects,
                entity_type: "project".into(),
                entity_id: project.project_id,
                action: EntityAction::Notified,
                details: json!({
                    "name": project.name,
                    "due_date": project.due_date,
                }),
            },
        )
        .await?;

        Ok(vec![notice])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bizflow_core::payload::{
        InvoicePayload, LeadPayload, OpportunityPayload, ProductPayload, ProjectPayload,
        QuotePayload,
    };
    use bizflow_event_bus::EventBus;
    use bizflow_test_support::{
        FailingMutationSink, FixedClock, RecordingMutationSink, fixed_now,
    };
    use chrono::NaiveDate;

    use crate::application::engine::PropagationEngine;

    struct Harness {
        bus: EventBus,
        engine: Arc<PropagationEngine>,
        sink: Arc<RecordingMutationSink>,
    }

    fn harness() -> Harness {
        let sink = Arc::new(RecordingMutationSink::new());
        let mutations: Arc<dyn MutationSink> = Arc::clone(&sink) as Arc<dyn MutationSink>;
        let bus = EventBus::new(Arc::new(FixedClock::default()));
        let engine = Arc::new(PropagationEngine::new(
            default_rules(&mutations),
            Arc::new(FixedClock::default()),
        ));
        engine.attach(&bus);
        Harness { bus, engine, sink }
    }

    #[test]
    fn test_default_table_order_and_triggers() {
        let mutations: Arc<dyn MutationSink> = Arc::new(RecordingMutationSink::new());

        let rules = default_rules(&mutations);

        let table: Vec<(&str, EventType)> = rules.iter().map(|r| (r.id(), r.trigger())).collect();
        assert_eq!(
            table,
            vec![
                (QUOTE_APPROVED_CREATES_INVOICE, EventType::QuoteApproved),
                (OPPORTUNITY_WON_CREATES_PROJECT, EventType::OpportunityWon),
                (INVOICE_PAID_UPDATES_CLIENT, EventType::InvoicePaid),
                (PRODUCT_LOW_STOCK_RAISES_ALERT, EventType::ProductLowStock),
                (LEAD_CONVERTED_CREATES_OPPORTUNITY, EventType::LeadConverted),
                (PROJECT_DELAYED_NOTIFIES_TEAM, EventType::ProjectDelayed),
            ]
        );
        assert!(rules.iter().all(PropagationRule::is_enabled));
    }

    #[tokio::test]
    async fn test_approved_quote_publishes_invoice() {
        // Arrange
        let h = harness();
        let quote_id = Uuid::new_v4();
        let client_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();

        // Act
        let root = h
            .bus
            .publish(
                EventPayload::QuoteApproved(QuotePayload {
                    quote_id,
                    client_id,
                    opportunity_id: None,
                    total_cents: 420_000,
                    currency: "EUR".into(),
                }),
                PublishOptions::from_source("quotes").with_tenant(tenant_id),
            )
            .await
            .unwrap();

        // Assert
        let events = h.bus.recent_events(10);
        let types: Vec<EventType> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(types, vec![EventType::InvoiceCreated, EventType::QuoteApproved]);

        let invoice_event = &events[0];
        assert_eq!(invoice_event.source, PROPAGATION_SOURCE);
        assert_eq!(invoice_event.tenant_id, Some(tenant_id));
        assert_eq!(invoice_event.causation_id, Some(root.id));
        assert_eq!(
            invoice_event.metadata["rule_id"],
            QUOTE_APPROVED_CREATES_INVOICE
        );
        match &invoice_event.payload {
            EventPayload::InvoiceCreated(invoice) => {
                assert_eq!(invoice.client_id, client_id);
                assert_eq!(invoice.quote_id, Some(quote_id));
                assert_eq!(invoice.amount_cents, 420_000);
                assert_eq!(invoice.currency, "EUR");
                assert_eq!(
                    invoice.due_date,
                    Some(NaiveDate::from_ymd_opt(2026, 2, 14).unwrap())
                );
            }
            other => panic!("expected InvoiceCreated, got {other:?}"),
        }

        let results = h.engine.recent_results(10);
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert!(result.success);
        assert_eq!(result.rule_id, QUOTE_APPROVED_CREATES_INVOICE);
        assert_eq!(result.completed_at, fixed_now());
        assert!(
            result
                .affected_entities
                .iter()
                .any(|e| e.entity_type == "invoice" && e.module == BusinessModule::Finance)
        );
        assert!(h.sink.applied().is_empty());
    }

    #[tokio::test]
    async fn test_won_opportunity_publishes_project() {
        let h = harness();
        let opportunity_id = Uuid::new_v4();

        h.bus
            .publish(
                EventPayload::OpportunityWon(OpportunityPayload {
                    opportunity_id,
                    client_id: None,
                    lead_id: None,
                    title: "Warehouse rollout".into(),
                    value_cents: 9_000_000,
                }),
                PublishOptions::default(),
            )
            .await
            .unwrap();

        let projects = h.bus.events_by_type(EventType::ProjectCreated, 10);
        assert_eq!(projects.len(), 1);
        match &projects[0].payload {
            EventPayload::ProjectCreated(project) => {
                assert_eq!(project.opportunity_id, Some(opportunity_id));
                assert_eq!(project.name, "Warehouse rollout");
            }
            other => panic!("expected ProjectCreated, got {other:?}"),
        }
        assert!(h.engine.recent_results(10)[0].success);
    }

    #[tokio::test]
    async fn test_converted_lead_publishes_opportunity() {
        let h = harness();
        let lead_id = Uuid::new_v4();

        h.bus
            .publish(
                EventPayload::LeadConverted(LeadPayload {
                    lead_id,
                    client_id: None,
                    name: "Globex".into(),
                    estimated_value_cents: Some(75_000),
                }),
                PublishOptions::default(),
            )
            .await
            .unwrap();

        let opportunities = h.bus.events_by_type(EventType::OpportunityCreated, 10);
        assert_eq!(opportunities.len(), 1);
        match &opportunities[0].payload {
            EventPayload::OpportunityCreated(opportunity) => {
                assert_eq!(opportunity.lead_id, Some(lead_id));
                assert_eq!(opportunity.value_cents, 75_000);
            }
            other => panic!("expected OpportunityCreated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_paid_invoice_updates_client_without_publishing() {
        // Arrange
        let h = harness();
        let invoice_id = Uuid::new_v4();
        let client_id = Uuid::new_v4();

        // Act
        h.bus
            .publish(
                EventPayload::InvoicePaid(InvoicePayload {
                    invoice_id,
                    client_id,
                    quote_id: None,
                    amount_cents: 15_500,
                    currency: "USD".into(),
                    due_date: None,
                }),
                PublishOptions::default(),
            )
            .await
            .unwrap();

        // Assert
        assert_eq!(h.bus.recent_events(10).len(), 1);
        let applied = h.sink.applied();
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0].entity_id, invoice_id);
        assert_eq!(applied[1].module, BusinessModule::Clients);
        assert_eq!(applied[1].entity_id, client_id);
        assert_eq!(applied[1].details["amount_paid_cents"], 15_500);

        let result = &h.engine.recent_results(10)[0];
        assert!(result.success);
        assert_eq!(result.affected_entities.len(), 2);
    }

    #[tokio::test]
    async fn test_low_stock_raises_alert_with_shortfall() {
        let h = harness();
        let product_id = Uuid::new_v4();

        h.bus
            .publish(
                EventPayload::ProductLowStock(ProductPayload {
                    product_id,
                    sku: "BOLT-M8".into(),
                    name: "M8 bolt".into(),
                    quantity_on_hand: 3,
                    reorder_level: 10,
                }),
                PublishOptions::default(),
            )
            .await
            .unwrap();

        let applied = h.sink.applied();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].action, EntityAction::Alerted);
        assert_eq!(applied[0].entity_id, product_id);
        assert_eq!(applied[0].details["shortfall"], 7);
    }

    #[tokio::test]
    async fn test_delayed_project_notifies() {
        let h = harness();
        let project_id = Uuid::new_v4();

        h.bus
            .publish(
                EventPayload::ProjectDelayed(ProjectPayload {
                    project_id,
                    client_id: None,
                    opportunity_id: None,
                    name: "ERP migration".into(),
                    due_date: NaiveDate::from_ymd_opt(2026, 1, 10),
                }),
                PublishOptions::default(),
            )
            .await
            .unwrap();

        let applied = h.sink.applied();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].action, EntityAction::Notified);
        assert_eq!(applied[0].details["due_date"], "2026-01-10");
    }

    #[tokio::test]
    async fn test_failing_sink_produces_failed_result() {
        // Arrange
        let mutations: Arc<dyn MutationSink> = Arc::new(FailingMutationSink::new());
        let bus = EventBus::new(Arc::new(FixedClock::default()));
        let engine = Arc::new(PropagationEngine::new(
            default_rules(&mutations),
            Arc::new(FixedClock::default()),
        ));
        engine.attach(&bus);

        // Act
        let result = bus
            .publish(
                EventPayload::ProductLowStock(ProductPayload {
                    product_id: Uuid::new_v4(),
                    sku: "NUT-M8".into(),
                    name: "M8 nut".into(),
                    quantity_on_hand: 0,
                    reorder_level: 50,
                }),
                PublishOptions::default(),
            )
            .await;

        // Assert
        assert!(result.is_ok());
        let results = engine.recent_results(10);
        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert!(results[0].affected_entities.is_empty());
        assert_eq!(
            results[0].errors,
            vec!["infrastructure error: connection refused"]
        );
    }

    #[tokio::test]
    async fn test_client_update_failure_reports_settled_invoice() {
        // Arrange
        let sink = Arc::new(FailingMutationSink::after(1));
        let mutations: Arc<dyn MutationSink> = Arc::clone(&sink) as Arc<dyn MutationSink>;
        let bus = EventBus::new(Arc::new(FixedClock::default()));
        let engine = Arc::new(PropagationEngine::new(
            default_rules(&mutations),
            Arc::new(FixedClock::default()),
        ));
        engine.attach(&bus);
        let invoice_id = Uuid::new_v4();

        // Act
        bus.publish(
            EventPayload::InvoicePaid(InvoicePayload {
                invoice_id,
                client_id: Uuid::new_v4(),
                quote_id: None,
                amount_cents: 8_200,
                currency: "USD".into(),
                due_date: None,
            }),
            PublishOptions::default(),
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(sink.applied().len(), 1);
        let result = &engine.recent_results(10)[0];
        assert!(!result.success);
        assert_eq!(
            result.errors,
            vec!["infrastructure error: connection refused"]
        );
        assert_eq!(result.affected_entities.len(), 1);
        assert_eq!(result.affected_entities[0].entity_type, "invoice");
        assert_eq!(result.affected_entities[0].entity_id, invoice_id);
    }

    #[tokio::test]
    async fn test_low_stock_shortfall_saturates_on_extreme_quantities() {
        let h = harness();

        h.bus
            .publish(
                EventPayload::ProductLowStock(ProductPayload {
                    product_id: Uuid::new_v4(),
                    sku: "GHOST-1".into(),
                    name: "Ghost stock".into(),
                    quantity_on_hand: i64::MIN,
                    reorder_level: 10,
                }),
                PublishOptions::default(),
            )
            .await
            .unwrap();

        assert!(h.engine.recent_results(10)[0].success);
        assert_eq!(h.sink.applied()[0].details["shortfall"], i64::MAX);
    }
}
