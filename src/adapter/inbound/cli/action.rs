//! Handlers for the action API commands: `token`, `dispatch`, and `serve`.

use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::adapter::inbound::cli::command::{DispatchArgs, TokenArgs};
use crate::adapter::inbound::cli::output;
use crate::application::NonceGuard;
use crate::error::{ConfigError, FilterError, Result};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::session::NONCE_SECRET_ENV;
use crate::infrastructure::config::{Config, SessionConfig};
use crate::port::inbound::action::{ActionRequest, Envelope, FilterApi};

/// Request understood by the line protocol itself: returns a fresh token
/// for the request's session and needs no token of its own.
pub const ISSUE_TOKEN: &str = "issue_token";

/// Execute `token [--session]`.
///
/// A token from this command is only useful to another process, so it
/// requires the shared secret instead of falling back to a random one.
pub fn execute_token(config: &Config, args: &TokenArgs) -> Result<()> {
    let secret = SessionConfig::secret_from_env().ok_or(ConfigError::MissingField {
        field: NONCE_SECRET_ENV,
    })?;
    let request = ActionRequest::new(ISSUE_TOKEN).with_session(args.session.as_str());
    let session = request.session_id();
    let nonce = NonceGuard::new(secret, config.session.nonce_lifetime_secs).issue(session);

    if output::is_json() {
        output::json_output(&json!({ "session": session, "nonce": nonce }));
    } else {
        println!("{nonce}");
    }
    Ok(())
}

/// Execute `dispatch <request>` and print the envelope.
pub async fn execute_dispatch(config: &Config, args: &DispatchArgs) -> Result<()> {
    let pool = bootstrap::open_store(config)?;
    let dispatcher = bootstrap::build_dispatcher(config, &pool)?;
    let envelope = handle_line(&dispatcher, &args.request).await;
    output::json_output(&serde_json::to_value(&envelope)?);
    Ok(())
}

/// Execute `serve`: one JSON request per stdin line, one envelope per
/// stdout line, until stdin closes.
pub async fn execute_serve(config: &Config) -> Result<()> {
    let pool = bootstrap::open_store(config)?;
    let dispatcher = bootstrap::build_dispatcher(config, &pool)?;
    info!("Serving action requests on stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut handled = 0_usize;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let envelope = handle_line(&dispatcher, &line).await;
        let mut bytes = serde_json::to_vec(&envelope)?;
        bytes.push(b'\n');
        stdout.write_all(&bytes).await?;
        stdout.flush().await?;
        handled += 1;
    }

    info!(requests = handled, "Input closed");
    Ok(())
}

/// Decode one request line and answer it.
///
/// Malformed JSON becomes an `invalid_argument` envelope rather than an
/// error, so a bad line never ends the loop.
pub async fn handle_line(api: &dyn FilterApi, line: &str) -> Envelope {
    let request: ActionRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Undecodable request line");
            return Envelope::failure(&FilterError::invalid("request", e.to_string()));
        }
    };

    if request.action == ISSUE_TOKEN {
        let session = request.session_id();
        return Envelope::ok(json!({
            "session": session,
            "nonce": api.issue_token(session),
        }));
    }
    api.dispatch(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::application::{ActionDispatcher, CompatibilityFilter, VehicleResolver};
    use crate::testkit::catalog::seeded_catalog;
    use crate::testkit::lookup::ScriptedLookup;
    use crate::testkit::product::InMemoryProductCatalog;

    fn dispatcher() -> ActionDispatcher {
        ActionDispatcher::new(
            VehicleResolver::new(Arc::new(seeded_catalog())),
            CompatibilityFilter::new(Arc::new(InMemoryProductCatalog::seeded())),
            Arc::new(ScriptedLookup::new()),
            NonceGuard::new("serve-secret", 3600),
        )
    }

    #[tokio::test]
    async fn malformed_line_is_invalid_argument() {
        let dispatcher = dispatcher();
        let envelope = handle_line(&dispatcher, "{not json").await;
        assert_eq!(envelope.error_code(), Some("invalid_argument"));

        let envelope = handle_line(&dispatcher, r#"{"nonce":"abc"}"#).await;
        assert_eq!(envelope.error_code(), Some("invalid_argument"));
    }

    #[tokio::test]
    async fn issued_token_authorizes_following_requests() {
        let dispatcher = dispatcher();
        let issued = handle_line(&dispatcher, r#"{"action":"issue_token","session":"web-1"}"#).await;
        assert!(issued.success);
        let nonce = issued.data["nonce"].as_str().unwrap().to_string();

        let line = json!({
            "action": "get_models",
            "nonce": nonce,
            "session": "web-1",
            "make": "Ford",
        })
        .to_string();
        let envelope = handle_line(&dispatcher, &line).await;
        assert!(envelope.success);
        assert_eq!(envelope.data, json!(["Fiesta", "Focus"]));
    }

    #[tokio::test]
    async fn token_is_bound_to_its_session() {
        let dispatcher = dispatcher();
        let issued = handle_line(&dispatcher, r#"{"action":"issue_token"}"#).await;
        assert_eq!(issued.data["session"], "anonymous");

        let line = json!({
            "action": "get_makes",
            "nonce": issued.data["nonce"],
            "session": "someone-else",
        })
        .to_string();
        let envelope = handle_line(&dispatcher, &line).await;
        assert_eq!(envelope.error_code(), Some("auth_rejected"));
    }
}
