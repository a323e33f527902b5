//! Request issuing on behalf of a goose user

use dracin_scenarios::{Archetype, HttpMethod, LoadPlan, RequestPlan, TaskKind, UserSession};
use goose::goose::GooseResponse;
use goose::prelude::*;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Settings shared by every request of an attack
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl TaskContext {
    pub fn from_plan(plan: &LoadPlan) -> Self {
        Self {
            headers: plan.headers.clone(),
            timeout: plan.timeout,
        }
    }
}

fn goose_method(method: HttpMethod) -> GooseMethod {
    match method {
        HttpMethod::Get => GooseMethod::Get,
        HttpMethod::Post => GooseMethod::Post,
    }
}

/// Send one planned request; goose records it under the plan's display name
pub async fn issue(
    user: &mut GooseUser,
    ctx: &TaskContext,
    plan: &RequestPlan,
) -> Result<GooseResponse, Box<TransactionError>> {
    let mut request_builder = user
        .get_request_builder(&goose_method(plan.method), &plan.path)?
        .timeout(ctx.timeout);
    for (name, value) in &ctx.headers {
        request_builder = request_builder.header(name.as_str(), value.as_str());
    }
    if let Some(authorization) = plan.authorization() {
        request_builder = request_builder.header("Authorization", authorization);
    }
    if let Some(ref body) = plan.body {
        request_builder = request_builder.json(body);
    }

    let goose_request = GooseRequest::builder()
        .set_request_builder(request_builder)
        .name(plan.name)
        .build();

    trace!("{}", plan);
    user.request(goose_request).await
}

/// Run a task picked by weight from `archetype`, as a fresh pick on every call
pub async fn run_weighted(
    ctx: Arc<TaskContext>,
    archetype: Arc<Archetype>,
    user: &mut GooseUser,
) -> TransactionResult {
    let kind = {
        let mut rng = rand::rng();
        match archetype.pick_task(&mut rng) {
            Some(task) => task.kind,
            None => return Ok(()),
        }
    };
    run_task(ctx, kind, user).await
}

/// Run one task for `user`: plan the request and send it. Flow steps also
/// carry the user's session from one step to the next.
pub async fn run_task(ctx: Arc<TaskContext>, kind: TaskKind, user: &mut GooseUser) -> TransactionResult {
    if !kind.is_flow_step() {
        let plan = {
            let mut rng = rand::rng();
            kind.plan(&mut rng, &mut UserSession::default())
        };
        issue(user, &ctx, &plan).await?;
        return Ok(());
    }

    let mut session = user
        .get_session_data::<UserSession>()
        .cloned()
        .unwrap_or_default();
    if !kind.applies_to(&session) {
        trace!("Skipping {} this round", kind);
        return Ok(());
    }

    let plan = {
        let mut rng = rand::rng();
        kind.plan(&mut rng, &mut session)
    };

    let (result, body) = match issue(user, &ctx, &plan).await {
        Ok(mut goose) => {
            let result = if kind.fails_on_server_errors_only() {
                accept_client_errors(user, &mut goose)
            } else {
                Ok(())
            };
            let body = match goose.response {
                Ok(response) if kind.reads_response() => {
                    response.json::<JsonValue>().await.ok()
                }
                _ => None,
            };
            (result, body)
        }
        Err(error) => (Err(error), None),
    };

    if kind.reads_response() {
        if body.is_none() {
            debug!("{} gave no usable body", kind);
        }
        {
            let mut rng = rand::rng();
            session.absorb(kind, &mut rng, body.as_ref());
        }
    }
    user.set_session_data(session);

    result
}

/// A 4xx answer counts as served; server errors and transport failures
/// (status 0) stay failed
fn accept_client_errors(user: &GooseUser, goose: &mut GooseResponse) -> TransactionResult {
    let status = goose.request.status_code;
    if !goose.request.success && is_client_error(status) {
        user.set_success(&mut goose.request)?;
    }
    Ok(())
}

fn is_client_error(status: u16) -> bool {
    (400..500).contains(&status)
}
