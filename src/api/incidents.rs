use super::IncidentsClient;
use crate::api::types::{
    CreateIncidentRequest, FilterOptions, Incident, IncidentCounts, IncidentPage,
    UpdateIncidentRequest,
};
use crate::error::Result;
use crate::query::{CountsQuery, ListQuery};
use tracing::{debug, info};

#[allow(async_fn_in_trait)]
pub trait IncidentsApi {
    async fn list_incidents(&self, query: &ListQuery) -> Result<IncidentPage>;

    async fn incident_counts(&self, query: &CountsQuery) -> Result<IncidentCounts>;

    async fn filter_options(&self) -> Result<FilterOptions>;

    async fn get_incident(&self, id: &str) -> Result<Incident>;
    async fn create_incident(&self, req: &CreateIncidentRequest) -> Result<Incident>;
    async fn update_incident(&self, id: &str, req: &UpdateIncidentRequest) -> Result<Incident>;
    async fn delete_incident(&self, id: &str) -> Result<()>;
}

impl IncidentsApi for IncidentsClient {
    async fn list_incidents(&self, query: &ListQuery) -> Result<IncidentPage> {
        let url = self.endpoint(&["incidents"])?;
        let pairs = query.to_pairs();
        debug!(%url, ?pairs, "listing incidents");

        let request = self.client.get(url).query(&pairs);
        self.execute_json(request, "/incidents", None).await
    }

    async fn incident_counts(&self, query: &CountsQuery) -> Result<IncidentCounts> {
        let url = self.endpoint(&["incidents", "counts"])?;
        let request = self.client.get(url).query(&query.to_pairs());
        self.execute_json(request, "/incidents/counts", None).await
    }

    async fn filter_options(&self) -> Result<FilterOptions> {
        let url = self.endpoint(&["incidents", "filters"])?;
        self.execute_json(self.client.get(url), "/incidents/filters", None)
            .await
    }

    async fn get_incident(&self, id: &str) -> Result<Incident> {
        let url = self.endpoint(&["incidents", id])?;
        self.execute_json(self.client.get(url), "/incidents/:id", Some(id))
            .await
    }

    async fn create_incident(&self, req: &CreateIncidentRequest) -> Result<Incident> {
        let url = self.endpoint(&["incidents"])?;
        let created: Incident = self
            .execute_json(self.client.post(url).json(req), "/incidents", None)
            .await?;
        info!(id = %created.id, title = %created.title, "incident created");
        Ok(created)
    }

    async fn update_incident(&self, id: &str, req: &UpdateIncidentRequest) -> Result<Incident> {
        let url = self.endpoint(&["incidents", id])?;
        let updated: Incident = self
            .execute_json(self.client.patch(url).json(req), "/incidents/:id", Some(id))
            .await?;
        info!(id, "incident updated");
        Ok(updated)
    }

    async fn delete_incident(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["incidents", id])?;
        self.execute(self.client.delete(url), "/incidents/:id", Some(id))
            .await?;
        info!(id, "incident deleted");
        Ok(())
    }
}
