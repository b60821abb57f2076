//! Integration tests for the signup and password-reset flows
//!
//! These drive complete wizard runs against mock collaborators, checking the
//! guard ordering, the payload handed to the terminal action and the
//! post-success side effects.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use medilink_rs::flow::error::{ApiFailure, SessionError};
use medilink_rs::flow::ports::{
    FinishReply, Navigator, TerminalPayload, TokenStore, VerificationApi, VerifyReply,
};
use medilink_rs::flow::wizard::{Advance, NoticeLevel, Wizard};
use medilink_rs::medilink::flows;
use medilink_rs::medilink::session::MemoryTokenStore;

// ============================================================================
// Mock Components
// ============================================================================

/// Mock backend with scripted replies; records every call.
struct MockBackend {
    send_calls: AtomicUsize,
    verify_calls: AtomicUsize,
    finish_calls: AtomicUsize,
    verify_msg: String,
    finish_reply: FinishReply,
    next_finish_error: Mutex<Option<String>>,
    captured_finish: Mutex<Option<HashMap<String, String>>>,
}

impl MockBackend {
    fn new(verify_msg: &str, finish_reply: FinishReply) -> Self {
        Self {
            send_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            finish_calls: AtomicUsize::new(0),
            verify_msg: verify_msg.to_string(),
            finish_reply,
            next_finish_error: Mutex::new(None),
            captured_finish: Mutex::new(None),
        }
    }

    /// Make the next `finish` call fail with the given server message.
    fn fail_next_finish(&self, msg: Option<&str>) {
        *self.next_finish_error.lock().unwrap() = Some(msg.unwrap_or("rejected").to_string());
    }
}

#[async_trait]
impl VerificationApi for MockBackend {
    async fn send_otp(&self, _email: &str) -> Result<(), ApiFailure> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn verify_otp(&self, _email: &str, _code: &str) -> Result<VerifyReply, ApiFailure> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        Ok(VerifyReply {
            msg: self.verify_msg.clone(),
        })
    }

    async fn finish(&self, payload: &TerminalPayload) -> Result<FinishReply, ApiFailure> {
        self.finish_calls.fetch_add(1, Ordering::SeqCst);
        *self.captured_finish.lock().unwrap() = Some(payload.values.clone());
        if let Some(msg) = self.next_finish_error.lock().unwrap().take() {
            return Err(ApiFailure::rejected(400, Some(msg)));
        }
        Ok(self.finish_reply.clone())
    }
}

/// Token store whose `store` always fails, for the persistence edge case.
struct BrokenTokenStore;

#[async_trait]
impl TokenStore for BrokenTokenStore {
    async fn store(&self, _token: &str) -> Result<(), SessionError> {
        Err(SessionError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only filesystem",
        )))
    }

    async fn load(&self) -> Result<String, SessionError> {
        Err(SessionError::NoToken)
    }
}

/// Records navigation targets.
struct RouteLog {
    routes: Mutex<Vec<String>>,
}

impl RouteLog {
    fn new() -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
        }
    }

    fn targets(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RouteLog {
    fn go(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

fn signup_token_reply() -> FinishReply {
    FinishReply {
        token: Some("session-token".to_string()),
        msg: None,
    }
}

fn reset_msg_reply() -> FinishReply {
    FinishReply {
        token: None,
        msg: Some("Password reset successfully!".to_string()),
    }
}

// ============================================================================
// Signup flow
// ============================================================================

#[tokio::test]
async fn test_signup_happy_path() {
    let backend = Arc::new(MockBackend::new(
        "OTP Verified successfully",
        signup_token_reply(),
    ));
    let tokens = Arc::new(MemoryTokenStore::new());
    let routes = Arc::new(RouteLog::new());
    let wizard = Wizard::new(
        flows::signup(),
        backend.clone(),
        tokens.clone(),
        routes.clone(),
    );

    assert!(matches!(
        wizard.advance("a@b.com").await,
        Advance::Moved { step: 1, .. }
    ));
    assert!(matches!(
        wizard.advance("123456").await,
        Advance::Moved { step: 2, .. }
    ));
    // name and phone collect locally, no network.
    assert!(matches!(
        wizard.advance("Alice").await,
        Advance::Moved { step: 3, notice: None }
    ));
    assert!(matches!(
        wizard.advance("03001234567").await,
        Advance::Moved { step: 4, notice: None }
    ));
    assert_eq!(backend.send_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.verify_calls.load(Ordering::SeqCst), 1);

    assert!(matches!(
        wizard.advance("Secret1!pass").await,
        Advance::Completed(_)
    ));

    // The terminal call got every collected field except the OTP code.
    let captured = backend.captured_finish.lock().unwrap().clone().unwrap();
    assert_eq!(captured.get("email").unwrap(), "a@b.com");
    assert_eq!(captured.get("name").unwrap(), "Alice");
    assert_eq!(captured.get("phone").unwrap(), "03001234567");
    assert_eq!(captured.get("password").unwrap(), "Secret1!pass");
    assert!(!captured.contains_key("otp"));

    assert_eq!(tokens.load().await.unwrap(), "session-token");
    assert_eq!(routes.targets(), ["/dashboard"]);
}

#[tokio::test]
async fn test_signup_allows_going_back_and_resending() {
    let backend = Arc::new(MockBackend::new(
        "OTP Verified successfully",
        signup_token_reply(),
    ));
    let wizard = Wizard::new(
        flows::signup(),
        backend.clone(),
        Arc::new(MemoryTokenStore::new()),
        Arc::new(RouteLog::new()),
    );

    wizard.advance("a@b.com").await;
    assert_eq!(wizard.retreat().await, Some(0));

    // Resend from the email step; verification state is untouched.
    assert!(matches!(
        wizard.advance("a@b.com").await,
        Advance::Moved { step: 1, .. }
    ));
    assert_eq!(backend.send_calls.load(Ordering::SeqCst), 2);
    assert!(wizard.state().await.otp_sent);
}

#[tokio::test]
async fn test_signup_token_store_failure_keeps_wizard_retriable() {
    let backend = Arc::new(MockBackend::new(
        "OTP Verified successfully",
        signup_token_reply(),
    ));
    let routes = Arc::new(RouteLog::new());
    let wizard = Wizard::new(
        flows::signup(),
        backend.clone(),
        Arc::new(BrokenTokenStore),
        routes.clone(),
    );

    wizard.advance("a@b.com").await;
    wizard.advance("123456").await;
    wizard.advance("Alice").await;
    wizard.advance("03001234567").await;

    let outcome = wizard.advance("Secret1!pass").await;
    match outcome {
        Advance::Stayed(notice) => assert_eq!(notice.level, NoticeLevel::Error),
        other => panic!("expected Stayed, got {:?}", other),
    }

    // No navigation happened; the flow is not finished.
    assert!(routes.targets().is_empty());
    assert!(!wizard.state().await.finished);
}

// ============================================================================
// Password-reset flow
// ============================================================================

#[tokio::test]
async fn test_reset_happy_path_navigates_to_login() {
    let backend = Arc::new(MockBackend::new("OTP Verified successfully", reset_msg_reply()));
    let tokens = Arc::new(MemoryTokenStore::new());
    let routes = Arc::new(RouteLog::new());
    let wizard = Wizard::new(
        flows::password_reset(),
        backend.clone(),
        tokens.clone(),
        routes.clone(),
    );

    wizard.advance("a@b.com").await;
    wizard.advance("123456").await;

    // The first password step is already terminal-gated and fires the reset.
    let outcome = wizard.advance("NewSecret1!").await;
    match outcome {
        Advance::Completed(notice) => {
            assert_eq!(notice.text, "Password reset successfully!")
        }
        other => panic!("expected Completed, got {:?}", other),
    }

    let captured = backend.captured_finish.lock().unwrap().clone().unwrap();
    assert_eq!(captured.get("email").unwrap(), "a@b.com");
    assert_eq!(captured.get("password").unwrap(), "NewSecret1!");
    assert!(!captured.contains_key("otp"));

    // Reset stores no token.
    assert!(matches!(tokens.load().await, Err(SessionError::NoToken)));
    assert_eq!(routes.targets(), ["/login"]);
}

#[tokio::test]
async fn test_reset_stays_guarded_while_unverified() {
    let backend = Arc::new(MockBackend::new("wrong code", reset_msg_reply()));
    let wizard = Wizard::new(
        flows::password_reset(),
        backend.clone(),
        Arc::new(MemoryTokenStore::new()),
        Arc::new(RouteLog::new()),
    );

    wizard.advance("a@b.com").await;

    // The verify reply lacks the expected wording, so the gate stays shut
    // however often the user retries.
    for _ in 0..3 {
        let outcome = wizard.advance("123456").await;
        assert!(matches!(outcome, Advance::Stayed(_)));
    }
    let state = wizard.state().await;
    assert!(!state.otp_verified);
    assert_eq!(state.current_step, 1);
    assert_eq!(backend.finish_calls.load(Ordering::SeqCst), 0);

    // The reset flow exposes no retreat either.
    assert_eq!(wizard.retreat().await, None);
}

#[tokio::test]
async fn test_reset_terminal_failure_is_retriable() {
    let backend = Arc::new(MockBackend::new("OTP Verified successfully", reset_msg_reply()));
    backend.fail_next_finish(Some("Password too weak"));
    let routes = Arc::new(RouteLog::new());
    let wizard = Wizard::new(
        flows::password_reset(),
        backend.clone(),
        Arc::new(MemoryTokenStore::new()),
        routes.clone(),
    );

    wizard.advance("a@b.com").await;
    wizard.advance("123456").await;

    // First attempt: the backend rejects; the server wording is surfaced and
    // the wizard stays on the password step.
    let outcome = wizard.advance("NewSecret1!").await;
    match outcome {
        Advance::Stayed(notice) => {
            assert_eq!(notice.level, NoticeLevel::Error);
            assert_eq!(notice.text, "Password too weak");
        }
        other => panic!("expected Stayed, got {:?}", other),
    }
    assert!(routes.targets().is_empty());

    // Second attempt succeeds without redoing email or OTP.
    let outcome = wizard.advance("NewSecret1!").await;
    assert!(matches!(outcome, Advance::Completed(_)));
    assert_eq!(backend.finish_calls.load(Ordering::SeqCst), 2);
    assert_eq!(routes.targets(), ["/login"]);
}

// ============================================================================
// Guard ordering across a whole run
// ============================================================================

#[tokio::test]
async fn test_verify_never_precedes_send() {
    let backend = Arc::new(MockBackend::new("nope", reset_msg_reply()));
    let wizard = Wizard::new(
        flows::password_reset(),
        backend.clone(),
        Arc::new(MemoryTokenStore::new()),
        Arc::new(RouteLog::new()),
    );

    // Submitting a code at step 0 fails email validation, no call.
    wizard.advance("123456").await;
    assert_eq!(backend.send_calls.load(Ordering::SeqCst), 0);
    assert_eq!(backend.verify_calls.load(Ordering::SeqCst), 0);

    // After a send, a verify with a non-matching reply keeps the gate shut.
    wizard.advance("a@b.com").await;
    let outcome = wizard.advance("123456").await;
    assert!(matches!(outcome, Advance::Stayed(_)));
    assert_eq!(backend.verify_calls.load(Ordering::SeqCst), 1);
    assert!(!wizard.state().await.otp_verified);
    assert_eq!(backend.finish_calls.load(Ordering::SeqCst), 0);
}
