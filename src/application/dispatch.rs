//! Action API dispatcher.
//!
//! Verifies the anti-forgery token, parses the action, and delegates to the
//! resolver, the compatibility filter, or the registration lookup. Every
//! outcome, including failures, is rendered as an [`Envelope`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::compatibility::CompatibilityFilter;
use super::resolver::VehicleResolver;
use super::session::{NonceGuard, SessionMemory};
use crate::error::FilterError;
use crate::port::inbound::action::{Action, ActionRequest, Envelope, FilterApi};
use crate::port::outbound::registration::RegistrationLookup;

/// Request-boundary handler for the filtering API.
pub struct ActionDispatcher {
    resolver: VehicleResolver,
    compatibility: CompatibilityFilter,
    lookup: Arc<dyn RegistrationLookup>,
    nonces: NonceGuard,
    sessions: SessionMemory,
}

impl ActionDispatcher {
    pub fn new(
        resolver: VehicleResolver,
        compatibility: CompatibilityFilter,
        lookup: Arc<dyn RegistrationLookup>,
        nonces: NonceGuard,
    ) -> Self {
        let sessions = SessionMemory::new(nonces.lifetime_secs());
        Self {
            resolver,
            compatibility,
            lookup,
            nonces,
            sessions,
        }
    }

    /// Advisory per-session memory of resolved vehicles.
    #[must_use]
    pub fn sessions(&self) -> &SessionMemory {
        &self.sessions
    }

    async fn handle(&self, request: &ActionRequest) -> Result<Value, FilterError> {
        let session = request.session_id();
        let token = request.nonce.as_deref().unwrap_or_default();
        if !self.nonces.verify(session, token) {
            warn!(action = %request.action, "Rejected request with missing or invalid token");
            return Err(FilterError::AuthRejected);
        }

        let action = Action::parse(request)?;
        debug!(action = action.name(), session = %session, "Dispatching action");

        let data = match action {
            Action::GetMakes => json!(self.resolver.makes()?),
            Action::GetModels { make } => json!(self.resolver.models(&make)?),
            Action::GetListings { make, model } => json!(self.resolver.listings(&make, &model)?),
            Action::GetYears {
                make,
                model,
                listing,
            } => json!(self.resolver.years(&make, &model, &listing)?),
            Action::GetEngines {
                make,
                model,
                listing,
                year,
            } => json!(self.resolver.engines(&make, &model, &listing, year)?),
            Action::GetVehicleId(criteria) => {
                let vehicle_id = self.resolver.resolve_id(&criteria)?;
                if let Some(id) = vehicle_id {
                    self.sessions.remember(session, id);
                }
                json!({ "vehicle_id": vehicle_id })
            }
            Action::FilterProducts { vehicle_id } => {
                let products = self.compatibility.filter_by_vehicle(vehicle_id)?;
                json!({ "vehicle_id": vehicle_id, "products": products })
            }
            Action::LookupVehicleByReg { reg_number } => {
                debug!(provider = self.lookup.name(), "Looking up registration");
                let result = self.lookup.lookup(&reg_number).await?;
                result.raw
            }
            Action::GetLastVehicle => {
                json!({ "vehicle_id": self.sessions.last_vehicle(session) })
            }
        };
        Ok(data)
    }
}

#[async_trait]
impl FilterApi for ActionDispatcher {
    async fn dispatch(&self, request: &ActionRequest) -> Envelope {
        match self.handle(request).await {
            Ok(data) => Envelope::ok(data),
            Err(err) => {
                match &err {
                    FilterError::Internal(detail) => {
                        error!(action = %request.action, error = %detail, "Action failed");
                    }
                    other => debug!(action = %request.action, error = %other, "Action rejected"),
                }
                Envelope::failure(&err)
            }
        }
    }

    fn issue_token(&self, session: &str) -> String {
        self.nonces.issue(session)
    }
}
