use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use domain::{
    entities::{
        message_templates::InsertMessageTemplateEntity,
        notification_rules::InsertNotificationRuleEntity,
    },
    repositories::{
        message_templates::MessageTemplateRepository,
        notification_history::NotificationHistoryRepository,
        notification_rules::NotificationRuleRepository,
    },
    value_objects::notifications::{
        InsertNotificationRuleModel, MessageTemplateDto, NotificationHistoryDto,
        NotificationRuleDto,
    },
};

#[derive(Debug, Error)]
pub enum NotificationRuleError {
    #[error("template name and body are required")]
    EmptyTemplate,
    #[error("template not found")]
    TemplateNotFound,
    #[error("rule needs exactly one of days_before or days_after")]
    InvalidOffset,
    #[error("day offset cannot be negative")]
    NegativeOffset,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl NotificationRuleError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            NotificationRuleError::EmptyTemplate
            | NotificationRuleError::InvalidOffset
            | NotificationRuleError::NegativeOffset => StatusCode::BAD_REQUEST,
            NotificationRuleError::TemplateNotFound => StatusCode::NOT_FOUND,
            NotificationRuleError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertTemplateModel {
    pub name: String,
    pub body: String,
}

pub struct NotificationRuleUseCase<T, R, H>
where
    T: MessageTemplateRepository + Send + Sync + 'static,
    R: NotificationRuleRepository + Send + Sync + 'static,
    H: NotificationHistoryRepository + Send + Sync + 'static,
{
    template_repo: Arc<T>,
    rule_repo: Arc<R>,
    history_repo: Arc<H>,
}

impl<T, R, H> NotificationRuleUseCase<T, R, H>
where
    T: MessageTemplateRepository + Send + Sync + 'static,
    R: NotificationRuleRepository + Send + Sync + 'static,
    H: NotificationHistoryRepository + Send + Sync + 'static,
{
    pub fn new(template_repo: Arc<T>, rule_repo: Arc<R>, history_repo: Arc<H>) -> Self {
        Self {
            template_repo,
            rule_repo,
            history_repo,
        }
    }

    pub async fn create_template(
        &self,
        company_id: Uuid,
        model: InsertTemplateModel,
    ) -> Result<Uuid, NotificationRuleError> {
        if model.name.trim().is_empty() || model.body.trim().is_empty() {
            return Err(NotificationRuleError::EmptyTemplate);
        }

        let template_id = self
            .template_repo
            .create(InsertMessageTemplateEntity {
                company_id,
                name: model.name,
                body: model.body,
            })
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "notification_rules: failed to insert template");
                NotificationRuleError::Internal(err)
            })?;

        info!(%company_id, %template_id, "notification_rules: template created");
        Ok(template_id)
    }

    pub async fn list_templates(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<MessageTemplateDto>, NotificationRuleError> {
        let templates = self
            .template_repo
            .list_by_company(company_id)
            .await
            .map_err(NotificationRuleError::Internal)?;

        Ok(templates.into_iter().map(MessageTemplateDto::from).collect())
    }

    pub async fn create_rule(
        &self,
        company_id: Uuid,
        model: InsertNotificationRuleModel,
    ) -> Result<Uuid, NotificationRuleError> {
        // One rule is one moment on the timeline relative to the due date.
        match (model.days_before, model.days_after) {
            (Some(_), None) | (None, Some(_)) => {}
            _ => {
                warn!(%company_id, "notification_rules: rejected ambiguous rule offsets");
                return Err(NotificationRuleError::InvalidOffset);
            }
        }
        if model.days_before.is_some_and(|d| d < 0) || model.days_after.is_some_and(|d| d < 0) {
            return Err(NotificationRuleError::NegativeOffset);
        }

        let template = self
            .template_repo
            .find_by_id(model.template_id)
            .await
            .map_err(NotificationRuleError::Internal)?
            .ok_or(NotificationRuleError::TemplateNotFound)?;
        if template.company_id != company_id {
            // A template belonging to another tenant is invisible here.
            return Err(NotificationRuleError::TemplateNotFound);
        }

        let rule_id = self
            .rule_repo
            .create(InsertNotificationRuleEntity {
                company_id,
                template_id: model.template_id,
                days_before: model.days_before,
                days_after: model.days_after,
                is_active: model.is_active,
            })
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "notification_rules: failed to insert rule");
                NotificationRuleError::Internal(err)
            })?;

        info!(
            %company_id,
            %rule_id,
            days_before = ?model.days_before,
            days_after = ?model.days_after,
            "notification_rules: rule created"
        );
        Ok(rule_id)
    }

    pub async fn list_rules(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<NotificationRuleDto>, NotificationRuleError> {
        let rules = self
            .rule_repo
            .list_by_company(company_id)
            .await
            .map_err(NotificationRuleError::Internal)?;

        Ok(rules.into_iter().map(NotificationRuleDto::from).collect())
    }

    pub async fn set_rule_active(
        &self,
        company_id: Uuid,
        rule_id: Uuid,
        is_active: bool,
    ) -> Result<(), NotificationRuleError> {
        self.rule_repo
            .set_active(rule_id, company_id, is_active)
            .await
            .map_err(|err| {
                error!(%company_id, %rule_id, db_error = ?err, "notification_rules: failed to toggle rule");
                NotificationRuleError::Internal(err)
            })?;

        info!(%company_id, %rule_id, is_active, "notification_rules: rule toggled");
        Ok(())
    }

    pub async fn list_history(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<NotificationHistoryDto>, NotificationRuleError> {
        let history = self
            .history_repo
            .list_by_company(company_id)
            .await
            .map_err(NotificationRuleError::Internal)?;

        Ok(history.into_iter().map(NotificationHistoryDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::{
        entities::message_templates::MessageTemplateEntity,
        repositories::{
            message_templates::MockMessageTemplateRepository,
            notification_history::MockNotificationHistoryRepository,
            notification_rules::MockNotificationRuleRepository,
        },
    };

    #[tokio::test]
    async fn list_templates_returns_dtos_without_tenant_column() {
        let company_id = Uuid::new_v4();
        let template_id = Uuid::new_v4();

        let mut template_repo = MockMessageTemplateRepository::new();
        template_repo.expect_list_by_company().returning(move |cid| {
            Box::pin(async move {
                Ok(vec![MessageTemplateEntity {
                    id: template_id,
                    company_id: cid,
                    name: "Lembrete".to_string(),
                    body: "Olá {nome}".to_string(),
                    created_at: Utc::now(),
                }])
            })
        });

        let usecase = NotificationRuleUseCase::new(
            Arc::new(template_repo),
            Arc::new(MockNotificationRuleRepository::new()),
            Arc::new(MockNotificationHistoryRepository::new()),
        );

        let templates = usecase.list_templates(company_id).await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id, template_id);
        let rendered = serde_json::to_value(&templates[0]).unwrap();
        assert!(rendered.get("company_id").is_none());
        assert_eq!(rendered["name"], "Lembrete");
    }

    fn usecase_with_template(
        company_id: Uuid,
        template_id: Uuid,
    ) -> NotificationRuleUseCase<
        MockMessageTemplateRepository,
        MockNotificationRuleRepository,
        MockNotificationHistoryRepository,
    > {
        let mut template_repo = MockMessageTemplateRepository::new();
        template_repo.expect_find_by_id().returning(move |id| {
            Box::pin(async move {
                if id == template_id {
                    Ok(Some(MessageTemplateEntity {
                        id,
                        company_id,
                        name: "Lembrete".to_string(),
                        body: "Olá {nome}".to_string(),
                        created_at: Utc::now(),
                    }))
                } else {
                    Ok(None)
                }
            })
        });

        let mut rule_repo = MockNotificationRuleRepository::new();
        rule_repo
            .expect_create()
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        NotificationRuleUseCase::new(
            Arc::new(template_repo),
            Arc::new(rule_repo),
            Arc::new(MockNotificationHistoryRepository::new()),
        )
    }

    #[tokio::test]
    async fn rule_requires_exactly_one_offset() {
        let company_id = Uuid::new_v4();
        let template_id = Uuid::new_v4();
        let usecase = usecase_with_template(company_id, template_id);

        let both = InsertNotificationRuleModel {
            template_id,
            days_before: Some(3),
            days_after: Some(1),
            is_active: true,
        };
        assert!(matches!(
            usecase.create_rule(company_id, both).await,
            Err(NotificationRuleError::InvalidOffset)
        ));

        let neither = InsertNotificationRuleModel {
            template_id,
            days_before: None,
            days_after: None,
            is_active: true,
        };
        assert!(matches!(
            usecase.create_rule(company_id, neither).await,
            Err(NotificationRuleError::InvalidOffset)
        ));
    }

    #[tokio::test]
    async fn rule_rejects_negative_offset() {
        let company_id = Uuid::new_v4();
        let template_id = Uuid::new_v4();
        let usecase = usecase_with_template(company_id, template_id);

        let model = InsertNotificationRuleModel {
            template_id,
            days_before: Some(-1),
            days_after: None,
            is_active: true,
        };
        assert!(matches!(
            usecase.create_rule(company_id, model).await,
            Err(NotificationRuleError::NegativeOffset)
        ));
    }

    #[tokio::test]
    async fn rule_rejects_foreign_template() {
        let company_id = Uuid::new_v4();
        let template_id = Uuid::new_v4();
        let usecase = usecase_with_template(Uuid::new_v4(), template_id);

        let model = InsertNotificationRuleModel {
            template_id,
            days_before: Some(3),
            days_after: None,
            is_active: true,
        };
        assert!(matches!(
            usecase.create_rule(company_id, model).await,
            Err(NotificationRuleError::TemplateNotFound)
        ));
    }

    #[tokio::test]
    async fn rule_with_valid_offset_is_created() {
        let company_id = Uuid::new_v4();
        let template_id = Uuid::new_v4();
        let usecase = usecase_with_template(company_id, template_id);

        let model = InsertNotificationRuleModel {
            template_id,
            days_before: None,
            days_after: Some(5),
            is_active: true,
        };
        usecase.create_rule(company_id, model).await.unwrap();
    }

    #[tokio::test]
    async fn template_requires_name_and_body() {
        let usecase = NotificationRuleUseCase::new(
            Arc::new(MockMessageTemplateRepository::new()),
            Arc::new(MockNotificationRuleRepository::new()),
            Arc::new(MockNotificationHistoryRepository::new()),
        );

        let result = usecase
            .create_template(
                Uuid::new_v4(),
                InsertTemplateModel {
                    name: "".to_string(),
                    body: "Olá {nome}".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(NotificationRuleError::EmptyTemplate)));
    }
}
