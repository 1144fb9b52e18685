//! User Notifications
//!
//! Blocking browser dialogs, the error boundary every screen funnels failed
//! backend calls through, and the shared mutate-then-refetch flow.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::error;

use crate::context::{use_auth, AppContext, AuthContext, Entity};
use crate::error::ApiError;

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Ask before a destructive action; a dialog failure counts as "no"
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Log a failed background load. An expired session signs the user out.
pub fn log_failure(auth: AuthContext, action: &str, err: &ApiError) {
    error!(action, %err, "backend call failed");
    if err.is_unauthorized() {
        auth.logout();
    }
}

/// Log a failed user action and tell the user what happened
pub fn report_failure(auth: AuthContext, action: &str, err: &ApiError) {
    log_failure(auth, action, err);
    alert(&format!("{}. {}", action, err.user_message()));
}

/// What a mutation touches and what the user is told about it
pub struct Feedback {
    pub touched: &'static [Entity],
    /// Success alert; empty for silent success
    pub done: &'static str,
    pub failed: &'static str,
}

/// Runs backend mutations for one screen
#[derive(Clone, Copy)]
pub struct Mutations {
    ctx: AppContext,
    auth: AuthContext,
}

pub fn use_mutations() -> Mutations {
    Mutations {
        ctx: expect_context::<AppContext>(),
        auth: use_auth(),
    }
}

impl Mutations {
    pub fn run<F, T>(&self, mutation: F, feedback: &'static Feedback)
    where
        F: Future<Output = Result<T, ApiError>> + 'static,
        T: 'static,
    {
        self.run_then(mutation, feedback, |_| ());
    }

    /// On success: invalidate, alert, then call `then` with the result
    pub fn run_then<F, T, C>(&self, mutation: F, feedback: &'static Feedback, then: C)
    where
        F: Future<Output = Result<T, ApiError>> + 'static,
        T: 'static,
        C: FnOnce(T) + 'static,
    {
        let (ctx, auth) = (self.ctx, self.auth);
        spawn_local(async move {
            match mutation.await {
                Ok(value) => {
                    ctx.invalidate_all(feedback.touched);
                    then(value);
                    if !feedback.done.is_empty() {
                        alert(feedback.done);
                    }
                }
                Err(err) => report_failure(auth, feedback.failed, &err),
            }
        });
    }
}
