use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, warn};
use uuid::Uuid;

use domain::{
    entities::{
        charges::ChargeEntity, notification_history::InsertNotificationHistoryEntity,
        notification_rules::NotificationRuleEntity,
    },
    repositories::{
        charges::ChargeRepository, message_templates::MessageTemplateRepository,
        notification_history::NotificationHistoryRepository,
        notification_rules::NotificationRuleRepository,
        whatsapp_instances::WhatsAppInstanceRepository,
    },
    templates::{ChargeContext, render},
    value_objects::enums::{
        charge_statuses::ChargeStatus, notification_statuses::NotificationStatus,
        whatsapp_statuses::WhatsAppStatus,
    },
};
use messaging::{InstanceCredentials, WhatsAppGateway};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub overdue_marked: usize,
    pub sent: usize,
    pub failed: usize,
    /// (rule, charge) pairs suppressed by an existing history row.
    pub deduped: usize,
    /// Companies passed over for lack of a connected WhatsApp instance.
    pub companies_skipped: usize,
}

/// A rule fires on the exact day offset, not a range. A rule created after
/// its day has passed stays silent instead of producing a late burst.
fn rule_matches(rule: &NotificationRuleEntity, charge: &ChargeEntity, today: NaiveDate) -> bool {
    let status = ChargeStatus::from_str(&charge.status).unwrap_or_default();
    if !matches!(status, ChargeStatus::Pending | ChargeStatus::Overdue) {
        return false;
    }

    let days_until_due = (charge.due_date - today).num_days();

    if let Some(days_before) = rule.days_before {
        if days_until_due == i64::from(days_before) {
            return true;
        }
    }
    if let Some(days_after) = rule.days_after {
        if days_until_due == -i64::from(days_after) {
            return true;
        }
    }
    false
}

pub struct NotificationEngine<C, R, T, H, I, W>
where
    C: ChargeRepository + Send + Sync + 'static,
    R: NotificationRuleRepository + Send + Sync + 'static,
    T: MessageTemplateRepository + Send + Sync + 'static,
    H: NotificationHistoryRepository + Send + Sync + 'static,
    I: WhatsAppInstanceRepository + Send + Sync + 'static,
    W: WhatsAppGateway + 'static,
{
    charge_repo: Arc<C>,
    rule_repo: Arc<R>,
    template_repo: Arc<T>,
    history_repo: Arc<H>,
    instance_repo: Arc<I>,
    whatsapp: Arc<W>,
}

impl<C, R, T, H, I, W> NotificationEngine<C, R, T, H, I, W>
where
    C: ChargeRepository + Send + Sync + 'static,
    R: NotificationRuleRepository + Send + Sync + 'static,
    T: MessageTemplateRepository + Send + Sync + 'static,
    H: NotificationHistoryRepository + Send + Sync + 'static,
    I: WhatsAppInstanceRepository + Send + Sync + 'static,
    W: WhatsAppGateway + 'static,
{
    pub fn new(
        charge_repo: Arc<C>,
        rule_repo: Arc<R>,
        template_repo: Arc<T>,
        history_repo: Arc<H>,
        instance_repo: Arc<I>,
        whatsapp: Arc<W>,
    ) -> Self {
        Self {
            charge_repo,
            rule_repo,
            template_repo,
            history_repo,
            instance_repo,
            whatsapp,
        }
    }

    /// One scheduler pass: flip past-due charges to overdue, then walk every
    /// active rule and deliver the messages that are due today. A failure on
    /// one charge never stops the rest of the pass.
    pub async fn run_tick(&self, today: NaiveDate) -> anyhow::Result<TickSummary> {
        let mut summary = TickSummary::default();

        summary.overdue_marked = self.charge_repo.mark_overdue_past_due(today).await?;
        if summary.overdue_marked > 0 {
            info!(
                overdue_marked = summary.overdue_marked,
                "notifications: charges flipped to overdue"
            );
        }

        let rules = self.rule_repo.list_active().await?;
        if rules.is_empty() {
            return Ok(summary);
        }

        // BTreeMap keeps company order stable across ticks.
        let mut rules_by_company: BTreeMap<Uuid, Vec<NotificationRuleEntity>> = BTreeMap::new();
        for rule in rules {
            rules_by_company.entry(rule.company_id).or_default().push(rule);
        }

        for (company_id, company_rules) in rules_by_company {
            if let Err(err) = self
                .run_company(company_id, &company_rules, today, &mut summary)
                .await
            {
                error!(
                    %company_id,
                    error = ?err,
                    "notifications: company pass failed"
                );
            }
        }

        info!(
            sent = summary.sent,
            failed = summary.failed,
            deduped = summary.deduped,
            companies_skipped = summary.companies_skipped,
            "notifications: tick finished"
        );
        Ok(summary)
    }

    async fn run_company(
        &self,
        company_id: Uuid,
        rules: &[NotificationRuleEntity],
        today: NaiveDate,
        summary: &mut TickSummary,
    ) -> anyhow::Result<()> {
        let Some(instance) = self.instance_repo.find_by_company(company_id).await? else {
            summary.companies_skipped += 1;
            return Ok(());
        };
        if WhatsAppStatus::from_str(&instance.status) != Some(WhatsAppStatus::Connected) {
            warn!(
                %company_id,
                status = %instance.status,
                "notifications: whatsapp not connected, skipping company"
            );
            summary.companies_skipped += 1;
            return Ok(());
        }

        let credentials = InstanceCredentials {
            instance_id: instance.instance_id,
            instance_token: instance.instance_token,
        };

        let charges = self.charge_repo.list_unpaid_by_company(company_id).await?;
        if charges.is_empty() {
            return Ok(());
        }

        let mut template_cache: HashMap<Uuid, Option<String>> = HashMap::new();

        for rule in rules {
            let body = match template_cache.get(&rule.template_id) {
                Some(cached) => cached.clone(),
                None => {
                    let body = self
                        .template_repo
                        .find_by_id(rule.template_id)
                        .await?
                        .map(|template| template.body);
                    template_cache.insert(rule.template_id, body.clone());
                    body
                }
            };
            let Some(body) = body else {
                warn!(
                    %company_id,
                    rule_id = %rule.id,
                    template_id = %rule.template_id,
                    "notifications: rule points at a missing template"
                );
                continue;
            };

            for charge in &charges {
                if !rule_matches(rule, charge, today) {
                    continue;
                }
                if let Err(err) = self
                    .deliver(company_id, rule, charge, &body, &credentials, summary)
                    .await
                {
                    error!(
                        %company_id,
                        rule_id = %rule.id,
                        charge_id = %charge.id,
                        error = ?err,
                        "notifications: delivery attempt failed"
                    );
                }
            }
        }

        Ok(())
    }

    async fn deliver(
        &self,
        company_id: Uuid,
        rule: &NotificationRuleEntity,
        charge: &ChargeEntity,
        template_body: &str,
        credentials: &InstanceCredentials,
        summary: &mut TickSummary,
    ) -> anyhow::Result<()> {
        if self.history_repo.exists(rule.id, charge.id).await? {
            summary.deduped += 1;
            return Ok(());
        }

        let message = render(
            template_body,
            &ChargeContext {
                customer_name: &charge.customer_name,
                amount_minor: i64::from(charge.amount_minor),
                due_date: charge.due_date,
                payment_link: charge.payment_link.as_deref(),
            },
        );

        let send_result = self
            .whatsapp
            .send_text(credentials, &charge.customer_phone, &message)
            .await;

        let (status, delivery_error) = match &send_result {
            Ok(_) => (NotificationStatus::Sent, None),
            Err(err) => (NotificationStatus::Failed, Some(err.to_string())),
        };

        self.history_repo
            .record(InsertNotificationHistoryEntity {
                company_id,
                rule_id: rule.id,
                charge_id: charge.id,
                phone: charge.customer_phone.clone(),
                message,
                status: status.to_string(),
                error: delivery_error.clone(),
            })
            .await?;

        match send_result {
            Ok(message_id) => {
                info!(
                    %company_id,
                    charge_id = %charge.id,
                    rule_id = %rule.id,
                    %message_id,
                    "notifications: message delivered"
                );
                summary.sent += 1;
            }
            Err(err) => {
                warn!(
                    %company_id,
                    charge_id = %charge.id,
                    rule_id = %rule.id,
                    error = ?err,
                    "notifications: message delivery failed"
                );
                summary.failed += 1;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use domain::{
        entities::{
            message_templates::MessageTemplateEntity, whatsapp_instances::WhatsAppInstanceEntity,
        },
        repositories::{
            charges::MockChargeRepository, message_templates::MockMessageTemplateRepository,
            notification_history::MockNotificationHistoryRepository,
            notification_rules::MockNotificationRuleRepository,
            whatsapp_instances::MockWhatsAppInstanceRepository,
        },
    };
    use messaging::MockWhatsAppGateway;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 12).unwrap()
    }

    fn sample_charge(company_id: Uuid, due_date: NaiveDate, status: ChargeStatus) -> ChargeEntity {
        let now = Utc::now();
        ChargeEntity {
            id: Uuid::new_v4(),
            company_id,
            client_id: None,
            customer_name: "Maria Silva".to_string(),
            customer_document: "11144477735".to_string(),
            customer_phone: "5511999990000".to_string(),
            description: None,
            amount_minor: 10050,
            due_date,
            status: status.to_string(),
            provider: Some("mercadopago".to_string()),
            provider_charge_id: Some("pref-1".to_string()),
            payment_link: Some("https://mp.example/checkout".to_string()),
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_rule(
        company_id: Uuid,
        template_id: Uuid,
        days_before: Option<i32>,
        days_after: Option<i32>,
    ) -> NotificationRuleEntity {
        NotificationRuleEntity {
            id: Uuid::new_v4(),
            company_id,
            template_id,
            days_before,
            days_after,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn connected_instance(company_id: Uuid) -> WhatsAppInstanceEntity {
        let now = Utc::now();
        WhatsAppInstanceEntity {
            id: Uuid::new_v4(),
            company_id,
            instance_id: "inst-1".to_string(),
            instance_token: "tok-1".to_string(),
            status: WhatsAppStatus::Connected.to_string(),
            qr_code: None,
            connected_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn rule_matches_exact_days_before() {
        let company_id = Uuid::new_v4();
        let rule = sample_rule(company_id, Uuid::new_v4(), Some(3), None);
        let charge = sample_charge(company_id, today() + Duration::days(3), ChargeStatus::Pending);

        assert!(rule_matches(&rule, &charge, today()));
    }

    #[test]
    fn rule_does_not_match_other_offsets() {
        let company_id = Uuid::new_v4();
        let rule = sample_rule(company_id, Uuid::new_v4(), Some(3), None);

        let charge = sample_charge(company_id, today() + Duration::days(2), ChargeStatus::Pending);
        assert!(!rule_matches(&rule, &charge, today()));

        let charge = sample_charge(company_id, today() + Duration::days(4), ChargeStatus::Pending);
        assert!(!rule_matches(&rule, &charge, today()));
    }

    #[test]
    fn rule_matches_days_after_for_overdue_charge() {
        let company_id = Uuid::new_v4();
        let rule = sample_rule(company_id, Uuid::new_v4(), None, Some(2));
        let charge = sample_charge(company_id, today() - Duration::days(2), ChargeStatus::Overdue);

        assert!(rule_matches(&rule, &charge, today()));
    }

    #[test]
    fn rule_ignores_settled_charges() {
        let company_id = Uuid::new_v4();
        let rule = sample_rule(company_id, Uuid::new_v4(), Some(0), None);

        let charge = sample_charge(company_id, today(), ChargeStatus::Paid);
        assert!(!rule_matches(&rule, &charge, today()));

        let charge = sample_charge(company_id, today(), ChargeStatus::Cancelled);
        assert!(!rule_matches(&rule, &charge, today()));
    }

    fn engine_with(
        charge_repo: MockChargeRepository,
        rule_repo: MockNotificationRuleRepository,
        template_repo: MockMessageTemplateRepository,
        history_repo: MockNotificationHistoryRepository,
        instance_repo: MockWhatsAppInstanceRepository,
        whatsapp: MockWhatsAppGateway,
    ) -> NotificationEngine<
        MockChargeRepository,
        MockNotificationRuleRepository,
        MockMessageTemplateRepository,
        MockNotificationHistoryRepository,
        MockWhatsAppInstanceRepository,
        MockWhatsAppGateway,
    > {
        NotificationEngine::new(
            Arc::new(charge_repo),
            Arc::new(rule_repo),
            Arc::new(template_repo),
            Arc::new(history_repo),
            Arc::new(instance_repo),
            Arc::new(whatsapp),
        )
    }

    #[tokio::test]
    async fn tick_sends_reminder_with_formatted_amount() {
        let company_id = Uuid::new_v4();
        let template_id = Uuid::new_v4();
        let rule = sample_rule(company_id, template_id, Some(3), None);
        let charge = sample_charge(company_id, today() + Duration::days(3), ChargeStatus::Pending);

        let mut charge_repo = MockChargeRepository::new();
        charge_repo
            .expect_mark_overdue_past_due()
            .returning(|_| Box::pin(async { Ok(0) }));
        let charges = vec![charge.clone()];
        charge_repo
            .expect_list_unpaid_by_company()
            .returning(move |_| {
                let charges = charges.clone();
                Box::pin(async move { Ok(charges) })
            });

        let mut rule_repo = MockNotificationRuleRepository::new();
        let rules = vec![rule.clone()];
        rule_repo.expect_list_active().returning(move || {
            let rules = rules.clone();
            Box::pin(async move { Ok(rules) })
        });

        let mut template_repo = MockMessageTemplateRepository::new();
        template_repo.expect_find_by_id().returning(move |id| {
            Box::pin(async move {
                Ok(Some(MessageTemplateEntity {
                    id,
                    company_id,
                    name: "Lembrete".to_string(),
                    body: "Olá {nome}, sua cobrança de {valor} vence em {vencimento}.".to_string(),
                    created_at: Utc::now(),
                }))
            })
        });

        let mut history_repo = MockNotificationHistoryRepository::new();
        history_repo
            .expect_exists()
            .returning(|_, _| Box::pin(async { Ok(false) }));
        history_repo
            .expect_record()
            .withf(|entity| {
                entity.status == "sent" && entity.message.contains("R$ 100,50")
            })
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let mut instance_repo = MockWhatsAppInstanceRepository::new();
        instance_repo.expect_find_by_company().returning(move |cid| {
            Box::pin(async move { Ok(Some(connected_instance(cid))) })
        });

        let mut whatsapp = MockWhatsAppGateway::new();
        whatsapp
            .expect_send_text()
            .withf(|_, phone, message| {
                phone == "5511999990000" && message.contains("R$ 100,50")
            })
            .returning(|_, _, _| Box::pin(async { Ok("msg-1".to_string()) }));

        let engine = engine_with(
            charge_repo,
            rule_repo,
            template_repo,
            history_repo,
            instance_repo,
            whatsapp,
        );

        let summary = engine.run_tick(today()).await.unwrap();
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn tick_deduplicates_already_notified_charges() {
        let company_id = Uuid::new_v4();
        let template_id = Uuid::new_v4();
        let rule = sample_rule(company_id, template_id, Some(3), None);
        let charge = sample_charge(company_id, today() + Duration::days(3), ChargeStatus::Pending);

        let mut charge_repo = MockChargeRepository::new();
        charge_repo
            .expect_mark_overdue_past_due()
            .returning(|_| Box::pin(async { Ok(0) }));
        let charges = vec![charge];
        charge_repo
            .expect_list_unpaid_by_company()
            .returning(move |_| {
                let charges = charges.clone();
                Box::pin(async move { Ok(charges) })
            });

        let mut rule_repo = MockNotificationRuleRepository::new();
        let rules = vec![rule];
        rule_repo.expect_list_active().returning(move || {
            let rules = rules.clone();
            Box::pin(async move { Ok(rules) })
        });

        let mut template_repo = MockMessageTemplateRepository::new();
        template_repo.expect_find_by_id().returning(move |id| {
            Box::pin(async move {
                Ok(Some(MessageTemplateEntity {
                    id,
                    company_id,
                    name: "Lembrete".to_string(),
                    body: "Olá {nome}".to_string(),
                    created_at: Utc::now(),
                }))
            })
        });

        let mut history_repo = MockNotificationHistoryRepository::new();
        history_repo
            .expect_exists()
            .returning(|_, _| Box::pin(async { Ok(true) }));
        // No record() expectation: a dedupe hit writes nothing.

        let mut instance_repo = MockWhatsAppInstanceRepository::new();
        instance_repo.expect_find_by_company().returning(move |cid| {
            Box::pin(async move { Ok(Some(connected_instance(cid))) })
        });

        let whatsapp = MockWhatsAppGateway::new();

        let engine = engine_with(
            charge_repo,
            rule_repo,
            template_repo,
            history_repo,
            instance_repo,
            whatsapp,
        );

        let summary = engine.run_tick(today()).await.unwrap();
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.deduped, 1);
        assert_eq!(summary.companies_skipped, 0);
    }

    #[tokio::test]
    async fn tick_skips_company_without_connected_instance() {
        let company_id = Uuid::new_v4();
        let rule = sample_rule(company_id, Uuid::new_v4(), Some(3), None);

        let mut charge_repo = MockChargeRepository::new();
        charge_repo
            .expect_mark_overdue_past_due()
            .returning(|_| Box::pin(async { Ok(0) }));

        let mut rule_repo = MockNotificationRuleRepository::new();
        let rules = vec![rule];
        rule_repo.expect_list_active().returning(move || {
            let rules = rules.clone();
            Box::pin(async move { Ok(rules) })
        });

        let mut instance_repo = MockWhatsAppInstanceRepository::new();
        instance_repo
            .expect_find_by_company()
            .returning(|_| Box::pin(async { Ok(None) }));

        let engine = engine_with(
            charge_repo,
            rule_repo,
            MockMessageTemplateRepository::new(),
            MockNotificationHistoryRepository::new(),
            instance_repo,
            MockWhatsAppGateway::new(),
        );

        let summary = engine.run_tick(today()).await.unwrap();
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.companies_skipped, 1);
        assert_eq!(summary.deduped, 0);
    }

    #[tokio::test]
    async fn failed_delivery_is_recorded_and_counted() {
        let company_id = Uuid::new_v4();
        let template_id = Uuid::new_v4();
        let rule = sample_rule(company_id, template_id, None, Some(1));
        let charge = sample_charge(company_id, today() - Duration::days(1), ChargeStatus::Overdue);

        let mut charge_repo = MockChargeRepository::new();
        charge_repo
            .expect_mark_overdue_past_due()
            .returning(|_| Box::pin(async { Ok(1) }));
        let charges = vec![charge];
        charge_repo
            .expect_list_unpaid_by_company()
            .returning(move |_| {
                let charges = charges.clone();
                Box::pin(async move { Ok(charges) })
            });

        let mut rule_repo = MockNotificationRuleRepository::new();
        let rules = vec![rule];
        rule_repo.expect_list_active().returning(move || {
            let rules = rules.clone();
            Box::pin(async move { Ok(rules) })
        });

        let mut template_repo = MockMessageTemplateRepository::new();
        template_repo.expect_find_by_id().returning(move |id| {
            Box::pin(async move {
                Ok(Some(MessageTemplateEntity {
                    id,
                    company_id,
                    name: "Atraso".to_string(),
                    body: "Sua cobrança venceu em {vencimento}".to_string(),
                    created_at: Utc::now(),
                }))
            })
        });

        let mut history_repo = MockNotificationHistoryRepository::new();
        history_repo
            .expect_exists()
            .returning(|_, _| Box::pin(async { Ok(false) }));
        history_repo
            .expect_record()
            .withf(|entity| entity.status == "failed" && entity.error.is_some())
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let mut instance_repo = MockWhatsAppInstanceRepository::new();
        instance_repo.expect_find_by_company().returning(move |cid| {
            Box::pin(async move { Ok(Some(connected_instance(cid))) })
        });

        let mut whatsapp = MockWhatsAppGateway::new();
        whatsapp
            .expect_send_text()
            .returning(|_, _, _| Box::pin(async { Err(anyhow::anyhow!("instance offline")) }));

        let engine = engine_with(
            charge_repo,
            rule_repo,
            template_repo,
            history_repo,
            instance_repo,
            whatsapp,
        );

        let summary = engine.run_tick(today()).await.unwrap();
        assert_eq!(summary.overdue_marked, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.sent, 0);
    }
}
