//! Task catalog: what each simulated action requests
//!
//! Most tasks are independent single calls. The journey, signup and watch
//! flows are step sequences that share a [`UserSession`]: a step may read
//! what an earlier one remembered, and a few steps are skipped when the
//! session says so.

use crate::catalog::{
    search_param, StreamSource, BOOK_IDS, JOURNEY_SEARCH_TERMS, REFERRAL_CODE_PREFIX,
    SEARCH_SOURCES, SEARCH_TERMS, SIGNUP_REFERRAL_CODE, STREAM_SOURCES, STRESS_EMAIL_DOMAIN,
    STRESS_PASSWORD, STRESS_USERNAME_PREFIX, THEATER_SOURCES,
};
use crate::request::{with_query, RequestPlan};
use rand::Rng;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::fmt;

pub const NAME_DRAMABOX_TRENDING: &str = "/api/dramabox/trending";
pub const NAME_REELSHORT_HOMEPAGE: &str = "/api/reelshort/homepage";
pub const NAME_DRAMAWAVE_HOME: &str = "/api/dramawave/home";
pub const NAME_SOURCE_THEATERS: &str = "/api/[source]/theaters";
pub const NAME_SOURCE_SEARCH: &str = "/api/[source]/search";
pub const NAME_HEALTH: &str = "/api/health";
pub const NAME_VIP_PLANS: &str = "/api/vip/plans";
pub const NAME_AUTH_LOGIN: &str = "/api/auth/login";
pub const NAME_CHECK_USERNAME: &str = "/api/auth/check-username";
pub const NAME_REFERRAL_SETTINGS: &str = "/api/referral/settings";
pub const NAME_REFERRAL_LOOKUP: &str = "/api/referral/lookup";
pub const NAME_DRAMABOX_DETAIL: &str = "/api/dramabox/detail";
pub const NAME_DRAMABOX_ALLSTREAMS: &str = "/api/dramabox/allstreams";
pub const NAME_DRAMABOX_STREAM: &str = "/api/dramabox/stream";
pub const NAME_REGISTER_PAGE: &str = "/register";
pub const NAME_AUTH_REGISTER: &str = "/api/auth/register";
pub const NAME_AUTH_ME: &str = "/api/auth/me";
pub const NAME_REFERRAL_ME: &str = "/api/referral/me";
pub const NAME_SOURCE_ALLSTREAMS: &str = "/api/[source]/allstreams";
pub const NAME_SOURCE_STREAM: &str = "/api/[source]/stream";

/// Episodes assumed when the episode list cannot be read
pub const DEFAULT_EPISODES: usize = 3;
/// Episodes counted from a listing
pub const MAX_LISTED_EPISODES: usize = 5;
/// Episodes one watch session plays
pub const MAX_WATCHED_EPISODES: u8 = 3;

/// Every action a simulated user can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    DramaboxTrending,
    ReelshortHomepage,
    DramawaveHome,
    SourceTheaters,
    Search,
    Health,
    VipPlans,
    Login,
    CheckUsername,
    ReferralSettings,
    ReferralLookup,
    JourneyLanding,
    JourneyTrending,
    JourneySearch,
    JourneyDetail,
    JourneyEpisodes,
    JourneyStream,
    SignupVisit,
    SignupLookup,
    SignupCheckUsername,
    SignupRegister,
    SignupLogin,
    SignupProfile,
    SignupReferralStatus,
    WatchBrowse,
    WatchEpisodes,
    /// Play episode `n`, 1-based
    WatchStream(u8),
}

impl TaskKind {
    /// Transaction label the engine reports this task under
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::DramaboxTrending => "homepage",
            TaskKind::ReelshortHomepage => "reelshort_home",
            TaskKind::DramawaveHome => "dramawave_home",
            TaskKind::SourceTheaters => "random_source",
            TaskKind::Search => "search",
            TaskKind::Health => "health",
            TaskKind::VipPlans => "vip_plans",
            TaskKind::Login => "login",
            TaskKind::CheckUsername => "check_username",
            TaskKind::ReferralSettings => "referral_settings",
            TaskKind::ReferralLookup => "referral_lookup",
            TaskKind::JourneyLanding => "01_landing",
            TaskKind::JourneyTrending => "02_browse_trending",
            TaskKind::JourneySearch => "03_search",
            TaskKind::JourneyDetail => "04_drama_detail",
            TaskKind::JourneyEpisodes => "05_episodes",
            TaskKind::JourneyStream => "06_stream",
            TaskKind::SignupVisit => "01_visit_referral",
            TaskKind::SignupLookup => "02_lookup_referral",
            TaskKind::SignupCheckUsername => "03_check_username",
            TaskKind::SignupRegister => "04_register",
            TaskKind::SignupLogin => "05_login",
            TaskKind::SignupProfile => "06_profile",
            TaskKind::SignupReferralStatus => "07_referral_status",
            TaskKind::WatchBrowse => "01_browse",
            TaskKind::WatchEpisodes => "02_all_episodes",
            TaskKind::WatchStream(1) => "03_watch_ep1",
            TaskKind::WatchStream(2) => "03_watch_ep2",
            TaskKind::WatchStream(_) => "03_watch_ep3",
        }
    }

    /// Step of a flow that shares per-user session state
    pub fn is_flow_step(&self) -> bool {
        matches!(
            self,
            TaskKind::JourneyLanding
                | TaskKind::JourneyTrending
                | TaskKind::JourneySearch
                | TaskKind::JourneyDetail
                | TaskKind::JourneyEpisodes
                | TaskKind::JourneyStream
                | TaskKind::SignupVisit
                | TaskKind::SignupLookup
                | TaskKind::SignupCheckUsername
                | TaskKind::SignupRegister
                | TaskKind::SignupLogin
                | TaskKind::SignupProfile
                | TaskKind::SignupReferralStatus
                | TaskKind::WatchBrowse
                | TaskKind::WatchEpisodes
                | TaskKind::WatchStream(_)
        )
    }

    /// Whether the response body feeds the session
    pub fn reads_response(&self) -> bool {
        matches!(
            self,
            TaskKind::JourneyTrending
                | TaskKind::SignupRegister
                | TaskKind::SignupLogin
                | TaskKind::WatchBrowse
                | TaskKind::WatchEpisodes
        )
    }

    /// Steps where a 4xx answer still counts as served; only server errors
    /// and transport failures fail them
    pub fn fails_on_server_errors_only(&self) -> bool {
        matches!(
            self,
            TaskKind::JourneyDetail
                | TaskKind::JourneyEpisodes
                | TaskKind::JourneyStream
                | TaskKind::SignupCheckUsername
                | TaskKind::SignupRegister
                | TaskKind::SignupLogin
                | TaskKind::SignupReferralStatus
                | TaskKind::WatchEpisodes
                | TaskKind::WatchStream(_)
        )
    }

    /// False when the session says this step is skipped this round
    pub fn applies_to(&self, session: &UserSession) -> bool {
        match self {
            TaskKind::SignupProfile | TaskKind::SignupReferralStatus => session.token().is_some(),
            TaskKind::WatchStream(episode) => *episode <= session.episodes_to_watch(),
            _ => true,
        }
    }

    /// Build the request for this task from fresh random inputs. Flow steps
    /// read and update `session`; a step that starts over resets what it owns.
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R, session: &mut UserSession) -> RequestPlan {
        match self {
            TaskKind::DramaboxTrending => {
                RequestPlan::get(NAME_DRAMABOX_TRENDING, NAME_DRAMABOX_TRENDING)
            }
            TaskKind::ReelshortHomepage => {
                RequestPlan::get(NAME_REELSHORT_HOMEPAGE, NAME_REELSHORT_HOMEPAGE)
            }
            TaskKind::DramawaveHome => RequestPlan::get(NAME_DRAMAWAVE_HOME, NAME_DRAMAWAVE_HOME),
            TaskKind::SourceTheaters => {
                let source = pick(rng, THEATER_SOURCES);
                RequestPlan::get(format!("/api/{}/theaters", source), NAME_SOURCE_THEATERS)
            }
            TaskKind::Search => {
                let term = pick(rng, SEARCH_TERMS);
                let source = pick(rng, SEARCH_SOURCES);
                search_plan(source, term)
            }
            TaskKind::Health | TaskKind::JourneyLanding => {
                RequestPlan::get(NAME_HEALTH, NAME_HEALTH)
            }
            TaskKind::VipPlans => RequestPlan::get(NAME_VIP_PLANS, NAME_VIP_PLANS),
            TaskKind::Login => {
                let n: u32 = rng.random_range(1..=9999);
                let username = format!("{}{}", STRESS_USERNAME_PREFIX, n);
                RequestPlan::post_json(NAME_AUTH_LOGIN, NAME_AUTH_LOGIN, credentials(&username))
            }
            TaskKind::CheckUsername => {
                let n: u32 = rng.random_range(1..=99999);
                check_username_plan(&format!("{}{}", STRESS_USERNAME_PREFIX, n))
            }
            TaskKind::ReferralSettings => {
                RequestPlan::get(NAME_REFERRAL_SETTINGS, NAME_REFERRAL_SETTINGS)
            }
            TaskKind::ReferralLookup => {
                let n: u32 = rng.random_range(1..=999);
                referral_lookup_plan(&format!("{}{}", REFERRAL_CODE_PREFIX, n))
            }
            TaskKind::JourneyTrending => {
                session.book_id = None;
                RequestPlan::get(NAME_DRAMABOX_TRENDING, NAME_DRAMABOX_TRENDING)
            }
            TaskKind::JourneySearch => {
                let term = pick(rng, JOURNEY_SEARCH_TERMS);
                search_plan("dramabox", term)
            }
            TaskKind::JourneyDetail => {
                let book_id = session.book_id_or_pick(rng);
                RequestPlan::get(
                    with_query(NAME_DRAMABOX_DETAIL, &[("bookId", book_id.as_str())]),
                    NAME_DRAMABOX_DETAIL,
                )
            }
            TaskKind::JourneyEpisodes => {
                let book_id = session.book_id_or_pick(rng);
                RequestPlan::get(
                    with_query(NAME_DRAMABOX_ALLSTREAMS, &[("bookId", book_id.as_str())]),
                    NAME_DRAMABOX_ALLSTREAMS,
                )
            }
            TaskKind::JourneyStream => {
                let book_id = session.book_id_or_pick(rng);
                RequestPlan::get(
                    with_query(
                        NAME_DRAMABOX_STREAM,
                        &[("bookId", book_id.as_str()), ("episode", "1")],
                    ),
                    NAME_DRAMABOX_STREAM,
                )
            }
            TaskKind::SignupVisit => {
                session.account = Some(SignupAccount::generate(rng));
                RequestPlan::get(
                    with_query(NAME_REGISTER_PAGE, &[("ref", SIGNUP_REFERRAL_CODE)]),
                    NAME_REGISTER_PAGE,
                )
            }
            TaskKind::SignupLookup => referral_lookup_plan(SIGNUP_REFERRAL_CODE),
            TaskKind::SignupCheckUsername => {
                check_username_plan(&session.account_or_create(rng).username)
            }
            TaskKind::SignupRegister => {
                let account = session.account_or_create(rng);
                let body = json!({
                    "username": account.username,
                    "password": STRESS_PASSWORD,
                    "email": account.email,
                    "referralCode": SIGNUP_REFERRAL_CODE,
                });
                RequestPlan::post_json(NAME_AUTH_REGISTER, NAME_AUTH_REGISTER, body)
            }
            TaskKind::SignupLogin => {
                let account = session.account_or_create(rng);
                RequestPlan::post_json(
                    NAME_AUTH_LOGIN,
                    NAME_AUTH_LOGIN,
                    credentials(&account.username),
                )
            }
            TaskKind::SignupProfile => {
                RequestPlan::get(NAME_AUTH_ME, NAME_AUTH_ME).with_bearer(session.token())
            }
            TaskKind::SignupReferralStatus => {
                RequestPlan::get(NAME_REFERRAL_ME, NAME_REFERRAL_ME).with_bearer(session.token())
            }
            TaskKind::WatchBrowse => {
                let source = &STREAM_SOURCES[rng.random_range(0..STREAM_SOURCES.len())];
                session.source = Some(source);
                session.book_id = None;
                session.episodes = None;
                RequestPlan::get(source.list_path, source.list_path)
            }
            TaskKind::WatchEpisodes => {
                let source = session.source_or_pick(rng);
                let content_id = session.book_id_or_pick(rng);
                RequestPlan::get(
                    with_query(
                        &format!("/api/{}/allstreams", source.name),
                        &[(source.id_param, content_id.as_str())],
                    ),
                    NAME_SOURCE_ALLSTREAMS,
                )
            }
            TaskKind::WatchStream(episode) => {
                let source = session.source_or_pick(rng);
                let content_id = session.book_id_or_pick(rng);
                let episode = episode.to_string();
                RequestPlan::get(
                    with_query(
                        &format!("/api/{}/stream", source.name),
                        &[
                            (source.id_param, content_id.as_str()),
                            ("episode", episode.as_str()),
                        ],
                    ),
                    NAME_SOURCE_STREAM,
                )
            }
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Throwaway account the signup flow registers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupAccount {
    pub username: String,
    pub email: String,
    /// Bearer token handed out by register or login
    pub token: Option<String>,
}

impl SignupAccount {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = format!("lt_{:016x}", rng.random::<u64>());
        Self {
            username: format!("{}{}", STRESS_USERNAME_PREFIX, id),
            email: format!("{}@{}", id, STRESS_EMAIL_DOMAIN),
            token: None,
        }
    }
}

/// Per-user state carried between the steps of a flow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSession {
    /// Book (or content id) the current flow is looking at
    pub book_id: Option<String>,
    /// Source the watch flow browses
    pub source: Option<&'static StreamSource>,
    /// Episodes listed by the watch flow's `allstreams` step
    pub episodes: Option<usize>,
    pub account: Option<SignupAccount>,
}

impl UserSession {
    /// The remembered book id, or a known one when none was remembered.
    /// A picked id is kept so the rest of the flow asks for the same book.
    pub fn book_id_or_pick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        self.book_id
            .get_or_insert_with(|| pick(rng, BOOK_IDS).to_string())
            .clone()
    }

    /// Remember a random book id from a trending response body
    pub fn remember_from<R: Rng + ?Sized>(&mut self, rng: &mut R, body: &JsonValue) -> bool {
        let ids = extract_book_ids(body);
        if ids.is_empty() {
            return false;
        }
        self.book_id = Some(ids[rng.random_range(0..ids.len())].clone());
        true
    }

    /// Feed the response of `kind` into the session. `None` stands for a body
    /// that was missing or not JSON.
    pub fn absorb<R: Rng + ?Sized>(&mut self, kind: TaskKind, rng: &mut R, body: Option<&JsonValue>) {
        match kind {
            TaskKind::JourneyTrending => {
                if let Some(body) = body {
                    self.remember_from(rng, body);
                }
            }
            TaskKind::WatchBrowse => {
                let ids = body.map(extract_content_ids).unwrap_or_default();
                if !ids.is_empty() {
                    self.book_id = Some(ids[rng.random_range(0..ids.len())].clone());
                }
            }
            TaskKind::WatchEpisodes => {
                let listed = body.map_or(DEFAULT_EPISODES, count_episodes);
                self.episodes = Some(listed.min(MAX_LISTED_EPISODES));
            }
            TaskKind::SignupRegister | TaskKind::SignupLogin => {
                if let (Some(token), Some(account)) =
                    (body.and_then(extract_token), self.account.as_mut())
                {
                    account.token = Some(token);
                }
            }
            _ => {}
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.account.as_ref()?.token.as_deref()
    }

    /// Episodes the watch flow plays this round
    pub fn episodes_to_watch(&self) -> u8 {
        let listed = self.episodes.unwrap_or(DEFAULT_EPISODES);
        listed.min(usize::from(MAX_WATCHED_EPISODES)) as u8
    }

    fn account_or_create<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &SignupAccount {
        self.account
            .get_or_insert_with(|| SignupAccount::generate(rng))
    }

    fn source_or_pick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &'static StreamSource {
        *self
            .source
            .get_or_insert_with(|| &STREAM_SOURCES[rng.random_range(0..STREAM_SOURCES.len())])
    }
}

/// Book ids listed under `data.results[*].bookId` of a trending response.
/// Numeric ids are accepted and rendered as strings.
pub fn extract_book_ids(body: &JsonValue) -> Vec<String> {
    body.pointer("/data/results")
        .and_then(JsonValue::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|item| id_field(item, "bookId"))
                .collect()
        })
        .unwrap_or_default()
}

/// Content ids of a source listing. The items sit under the first of
/// `data.results`, `data.list` or `data.data`; an item names its content by
/// `bookId`, `id` or `shortPlayId`.
pub fn extract_content_ids(body: &JsonValue) -> Vec<String> {
    let items = ["/data/results", "/data/list", "/data/data"]
        .iter()
        .find_map(|pointer| body.pointer(pointer).filter(|value| !value.is_null()));

    items
        .and_then(JsonValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    ["bookId", "id", "shortPlayId"]
                        .iter()
                        .find_map(|key| id_field(item, key))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Length of `data.episodes` or `data.list`; zero when neither is a list
pub fn count_episodes(body: &JsonValue) -> usize {
    ["/data/episodes", "/data/list"]
        .iter()
        .find_map(|pointer| body.pointer(pointer).filter(|value| !value.is_null()))
        .and_then(JsonValue::as_array)
        .map_or(0, Vec::len)
}

/// `data.token` of a register or login response
pub fn extract_token(body: &JsonValue) -> Option<String> {
    body.pointer("/data/token")
        .and_then(JsonValue::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn id_field(item: &JsonValue, key: &str) -> Option<String> {
    match item.get(key)? {
        JsonValue::String(id) if !id.is_empty() => Some(id.clone()),
        JsonValue::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn search_plan(source: &str, term: &str) -> RequestPlan {
    RequestPlan::get(
        with_query(
            &format!("/api/{}/search", source),
            &[(search_param(source), term)],
        ),
        NAME_SOURCE_SEARCH,
    )
}

fn check_username_plan(username: &str) -> RequestPlan {
    RequestPlan::get(
        with_query(NAME_CHECK_USERNAME, &[("username", username)]),
        NAME_CHECK_USERNAME,
    )
}

fn referral_lookup_plan(code: &str) -> RequestPlan {
    RequestPlan::get(
        format!("{}/{}", NAME_REFERRAL_LOOKUP, code),
        NAME_REFERRAL_LOOKUP,
    )
}

fn credentials(username: &str) -> JsonValue {
    json!({
        "username": username,
        "password": STRESS_PASSWORD,
    })
}

/// Uniform choice from a non-empty constant pool
fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}
