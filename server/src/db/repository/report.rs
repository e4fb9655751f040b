//! Report Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::Report;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const REPORT_TABLE: &str = "report";

#[derive(Clone)]
pub struct ReportRepository {
    base: BaseRepository,
}

impl ReportRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, report: Report) -> RepoResult<Report> {
        let created: Option<Report> = self.base.db().create(REPORT_TABLE).content(report).await?;
        created.ok_or_else(|| RepoError::Database("create returned no report".into()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Report>> {
        let report: Option<Report> = self.base.db().select(parse_id(REPORT_TABLE, id)?).await?;
        Ok(report)
    }

    /// Reports for moderation, optionally filtered on handled state
    pub async fn find_all(
        &self,
        handled: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Report>> {
        let reports: Vec<Report> = if let Some(handled) = handled {
            self.base
                .db()
                .query(
                    "SELECT * FROM report WHERE handled = $handled \
                     ORDER BY created_at DESC LIMIT $limit START $offset",
                )
                .bind(("handled", handled))
                .bind(("limit", limit))
                .bind(("offset", offset))
                .await?
                .take(0)?
        } else {
            self.base
                .db()
                .query("SELECT * FROM report ORDER BY created_at DESC LIMIT $limit START $offset")
                .bind(("limit", limit))
                .bind(("offset", offset))
                .await?
                .take(0)?
        };
        Ok(reports)
    }

    /// Mark handled with an optional resolution note (admin)
    pub async fn resolve(&self, id: &str, resolution: Option<String>) -> RepoResult<Report> {
        let report: Option<Report> = self
            .base
            .db()
            .update(parse_id(REPORT_TABLE, id)?)
            .merge(serde_json::json!({
                "handled": true,
                "resolution": resolution,
            }))
            .await?;
        report.ok_or_else(|| RepoError::NotFound(format!("report {}", id)))
    }
}
