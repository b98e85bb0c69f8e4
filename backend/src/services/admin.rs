//! Admin service
//!
//! Account approval workflow. Vendor and dealer registrations sit in
//! `pending` until an admin approves or rejects them; customers never pass
//! through here.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::NotificationService;
use shared::models::{ApprovalStatus, NotificationType, UserRole};

/// Admin service
#[derive(Clone)]
pub struct AdminService {
    db: PgPool,
}

/// A registration awaiting review
#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct PendingAccount {
    pub id: Uuid,
    pub role: String,
    pub name: String,
    pub email: String,
    pub shop_name: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AdminService {
    /// Create a new AdminService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Vendor and dealer accounts still waiting for a decision, oldest first
    pub async fn pending_accounts(&self) -> AppResult<Vec<PendingAccount>> {
        let accounts = sqlx::query_as::<_, PendingAccount>(
            r#"
            SELECT id, role, name, email, shop_name, city, created_at
            FROM users
            WHERE role IN ('vendor', 'dealer') AND approval_status = 'pending'
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(accounts)
    }

    /// Approve or reject a pending vendor/dealer registration
    pub async fn review_account(
        &self,
        account_id: Uuid,
        decision: ApprovalStatus,
    ) -> AppResult<()> {
        if decision == ApprovalStatus::Pending {
            return Err(AppError::Validation {
                field: "decision".to_string(),
                message: "Decision must be 'approved' or 'rejected'".to_string(),
            });
        }

        let account = sqlx::query_as::<_, (String, String)>(
            "SELECT role, approval_status FROM users WHERE id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Account".to_string()))?;

        let role: UserRole = account.0.parse().map_err(|e: String| AppError::Internal(e))?;
        if !role.requires_approval() {
            return Err(AppError::Validation {
                field: "account_id".to_string(),
                message: format!("{} accounts do not go through approval", role),
            });
        }
        if account.1 != "pending" {
            return Err(AppError::InvalidStateTransition(format!(
                "Account is already {}",
                account.1
            )));
        }

        let decision_str = match decision {
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::Pending => unreachable!("guarded above"),
        };

        let updated = sqlx::query(
            "UPDATE users SET approval_status = $1, updated_at = NOW() WHERE id = $2 AND approval_status = 'pending'",
        )
        .bind(decision_str)
        .bind(account_id)
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::InvalidStateTransition(
                "Account was reviewed concurrently".to_string(),
            ));
        }

        tracing::info!(account_id = %account_id, decision = decision_str, "Account reviewed");

        let (title, message) = match decision {
            ApprovalStatus::Approved => (
                "Account approved",
                format!("Your {} account has been approved. You can now log in.", role),
            ),
            _ => (
                "Account rejected",
                format!("Your {} registration was not approved.", role),
            ),
        };

        let notifications = NotificationService::new(self.db.clone());
        if let Err(e) = notifications
            .create(account_id, title, &message, NotificationType::Account)
            .await
        {
            tracing::warn!(account_id = %account_id, "Failed to notify account of decision: {}", e);
        }

        Ok(())
    }
}
