#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, task::JoinHandle};

use acresbot_lib::config::{Config, TelegramConfig};

pub const TEST_CHAT_ID: &str = "chat-1";
pub const TEST_BOT_TOKEN: &str = "TESTTOKEN";

/// A plausible captured request: two headers plus the forum cookies,
/// including a flag-style cookie without a value.
pub const CAPTURED_REQUEST: &str =
    "curl 'https://api.example.com/api/users/checkin' -H 'Accept: application/json' -b 'sid=abc; flag'";

/// Canned responses for one test scenario.
pub struct MockScenario {
    pub checkin_get: Value,
    pub checkin_post: Value,
    pub question_get: Value,
    pub question_post: Value,
    pub answer_key: Value,
}

impl Default for MockScenario {
    fn default() -> Self {
        Self {
            checkin_get: json!({"errno": 0, "emotion": [{"qdxq": "kx"}, {"qdxq": "ng"}]}),
            checkin_post: json!({"errno": 0, "msg": "签到成功"}),
            question_get: json!({
                "errno": 0,
                "question": {
                    "id": 42,
                    "qc": "q-20260804",
                    "a1": "{hide}Paris{/hide}",
                    "a2": "London"
                }
            }),
            question_post: json!({"errno": 0, "msg": "已答题"}),
            answer_key: json!({"q-20260804": "Paris"}),
        }
    }
}

/// Everything the mock observed, for assertions.
#[derive(Default)]
pub struct Recorded {
    pub checkin_gets: usize,
    pub checkin_posts: Vec<Value>,
    pub question_gets: usize,
    pub question_posts: Vec<Value>,
    pub answer_key_gets: usize,
    pub telegram_posts: Vec<Value>,
}

#[derive(Clone)]
struct MockState {
    recorded: Arc<Mutex<Recorded>>,
    scenario: Arc<MockScenario>,
}

/// Minimal local mock of the forum API, the answer-key document, and
/// the Telegram sendMessage endpoint.
///
/// This is used by integration tests to ensure *no external network*
/// is needed.
pub struct MockForumServer {
    pub base_url: String,
    pub recorded: Arc<Mutex<Recorded>>,
    _task: JoinHandle<()>,
}

impl MockForumServer {
    pub async fn start(scenario: MockScenario) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let addr: SocketAddr = listener
            .local_addr()
            .expect("failed to get mock server addr");
        let base_url = format!("http://{}", addr);

        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let state = MockState {
            recorded: recorded.clone(),
            scenario: Arc::new(scenario),
        };

        async fn checkin_get(State(state): State<MockState>) -> Json<Value> {
            state.recorded.lock().unwrap().checkin_gets += 1;
            Json(state.scenario.checkin_get.clone())
        }

        async fn checkin_post(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
            let mut recorded = state.recorded.lock().unwrap();
            recorded.checkin_posts.push(body);
            Json(state.scenario.checkin_post.clone())
        }

        async fn question_get(State(state): State<MockState>) -> Json<Value> {
            state.recorded.lock().unwrap().question_gets += 1;
            Json(state.scenario.question_get.clone())
        }

        async fn question_post(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
            let mut recorded = state.recorded.lock().unwrap();
            recorded.question_posts.push(body);
            Json(state.scenario.question_post.clone())
        }

        async fn answer_key(State(state): State<MockState>) -> Json<Value> {
            state.recorded.lock().unwrap().answer_key_gets += 1;
            Json(state.scenario.answer_key.clone())
        }

        async fn telegram(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
            let mut recorded = state.recorded.lock().unwrap();
            recorded.telegram_posts.push(body);
            Json(json!({"ok": true, "result": {}}))
        }

        let app = Router::new()
            .route("/api/users/checkin", get(checkin_get).post(checkin_post))
            .route(
                "/api/daily_questions",
                get(question_get).post(question_post),
            )
            .route("/questions.json", get(answer_key))
            .route(
                &format!("/bot{}/sendMessage", TEST_BOT_TOKEN),
                post(telegram),
            )
            .with_state(state);

        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server failed");
        });

        Self {
            base_url,
            recorded,
            _task: task,
        }
    }
}

/// Config wired to the mock for everything remote.
pub fn test_config(mock: &MockForumServer) -> Config {
    Config::new()
        .with_api_base(&mock.base_url)
        .with_answer_key_url(&format!("{}/questions.json", mock.base_url))
        .with_captured_request(CAPTURED_REQUEST)
        .with_telegram(TelegramConfig {
            chat_id: TEST_CHAT_ID.to_string(),
            bot_token: TEST_BOT_TOKEN.to_string(),
            api_base: mock.base_url.clone(),
        })
}
