//! Verification service: drives the session lifecycle.
//!
//! Reacts to two host events. A member-increase notice issues a challenge
//! code over a direct message and opens a session; every later group message
//! from a pending member is screened against that session — expiry kicks,
//! mismatch deletes, a match welcomes. All platform calls are best-effort:
//! failures are logged at the call site and the local state transition still
//! applies, so the host dispatcher never observes a fault.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chat_events::{GroupMessageEvent, NoticeEvent, NoticeKind};
use tracing::{debug, info, warn};

use crate::adapters::{GatewayRegistry, OsRngCodeGenerator};
use crate::config::VerificationConfig;
use crate::domain::{SessionStore, VerificationSession};
use crate::error::{GatewayError, Result};
use crate::ports::{
    CodeGenerator, GatewayCapability, GroupEventHandler, PlatformGateway, SystemTimeSource,
    TimeSource,
};

/// Reminder sent privately when a pending member posts anything that is not
/// the code; also appended to the challenge message.
const CODE_ONLY_REMINDER: &str = "Send the verification code digits only, nothing else.";

/// Controller for the verification flow.
///
/// Owns the session table; the gateway registry, clock, and code generator
/// are injected. One instance serves all groups and may be invoked
/// concurrently — resolution races collapse to a single winner inside
/// [`SessionStore`].
pub struct VerificationService {
    store: Arc<SessionStore>,
    registry: Arc<GatewayRegistry>,
    config: VerificationConfig,
    time: Arc<dyn TimeSource>,
    codes: Arc<dyn CodeGenerator>,
}

impl VerificationService {
    /// Creates a service with system time and OS-entropy codes.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration fails validation.
    pub fn new(registry: Arc<GatewayRegistry>, config: VerificationConfig) -> Result<Self> {
        config.validate()?;
        info!("[gk-verification] initializing verification service");
        info!("  code length: {}", config.code_length);
        info!("  timeout: {}s", config.timeout_secs);

        Ok(Self {
            store: Arc::new(SessionStore::new()),
            registry,
            config,
            time: Arc::new(SystemTimeSource),
            codes: Arc::new(OsRngCodeGenerator),
        })
    }

    /// Replaces the time source (deterministic tests).
    #[must_use]
    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    /// Replaces the code generator (deterministic tests).
    #[must_use]
    pub fn with_code_generator(mut self, codes: Arc<dyn CodeGenerator>) -> Self {
        self.codes = codes;
        self
    }

    /// The session table, for host introspection and tests.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Gateway dispatch (best-effort)
    // ------------------------------------------------------------------

    fn gateway(&self, capability: GatewayCapability) -> Option<Arc<dyn PlatformGateway>> {
        let gateway = self.registry.with_capability(capability);
        if gateway.is_none() {
            warn!(
                error = %GatewayError::MissingCapability(capability),
                "skipping platform call"
            );
        }
        gateway
    }

    async fn send_private(&self, member_id: &str, text: &str) {
        if let Some(gateway) = self.gateway(GatewayCapability::SendMessage) {
            if let Err(error) = gateway.send_private_message(member_id, text).await {
                warn!(member_id, adapter = gateway.name(), %error, "private message failed");
            }
        }
    }

    async fn send_group_notice(&self, group_id: &str, text: &str) {
        if let Some(gateway) = self.gateway(GatewayCapability::SendMessage) {
            if let Err(error) = gateway.send_group_message(group_id, text).await {
                warn!(group_id, adapter = gateway.name(), %error, "group notice failed");
            }
        }
    }

    async fn delete_message(&self, message_id: &str) {
        if let Some(gateway) = self.gateway(GatewayCapability::DeleteMessage) {
            if let Err(error) = gateway.delete_message(message_id).await {
                warn!(message_id, adapter = gateway.name(), %error, "message deletion failed");
            }
        }
    }

    async fn kick(&self, group_id: &str, member_id: &str) {
        if let Some(gateway) = self.gateway(GatewayCapability::RemoveMember) {
            // A kicked member may rejoin and try again, so never reject
            // future join requests.
            if let Err(error) = gateway.remove_member(group_id, member_id, false).await {
                warn!(
                    member_id,
                    group_id,
                    adapter = gateway.name(),
                    %error,
                    "kick failed; member may still be in the group"
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------

    async fn issue_challenge(&self, notice: &NoticeEvent) {
        let code = self.codes.generate(self.config.code_length);
        let timeout_secs = self.config.timeout_secs;

        self.store.create(VerificationSession::new(
            notice.member_id.clone(),
            notice.group_id.clone(),
            code.clone(),
            self.time.now(),
            timeout_secs,
        ));

        let challenge = format!(
            "Welcome to the group! Reply in the group with this verification code \
             within {timeout_secs} seconds:\n{code}\n\n{CODE_ONLY_REMINDER}"
        );
        self.send_private(&notice.member_id, &challenge).await;

        info!(
            member_id = %notice.member_id,
            group_id = %notice.group_id,
            "verification code issued"
        );
        debug!(member_id = %notice.member_id, %code, "challenge code");
    }

    async fn screen_message(&self, message: &GroupMessageEvent) {
        // Clone the session out; no store guard may be held across an await.
        let Some(session) = self.store.get(&message.sender_id) else {
            return;
        };

        let now = self.time.now();
        if session.is_expired(now) {
            // Claim before side effects so a racing handler no-ops. Expiry
            // wins over content: a correct code past the window still kicks.
            let Some(claimed) = self.store.claim_expired(&message.sender_id, now) else {
                return;
            };
            self.kick(&claimed.group_id, &claimed.member_id).await;
            self.send_group_notice(
                &claimed.group_id,
                &format!(
                    "Verification timed out; {} has been removed from the group.",
                    message.sender_name
                ),
            )
            .await;
            info!(
                member_id = %claimed.member_id,
                group_id = %claimed.group_id,
                "verification timed out, member removed"
            );
            return;
        }

        if !session.accepts(&message.text) {
            // Session stays intact; the member may retry with the same code.
            self.delete_message(&message.message_id).await;
            self.send_private(&message.sender_id, CODE_ONLY_REMINDER).await;
            info!(
                member_id = %message.sender_id,
                group_id = %session.group_id,
                "non-code message during verification, deleted"
            );
            return;
        }

        let Some(claimed) = self.store.claim_verified(&message.sender_id, &message.text) else {
            return;
        };
        self.send_group_notice(
            &claimed.group_id,
            &format!("Welcome, {}! Verification passed.", message.sender_name),
        )
        .await;
        info!(
            member_id = %claimed.member_id,
            group_id = %claimed.group_id,
            "verification succeeded"
        );
    }

    // ------------------------------------------------------------------
    // Optional expiry sweep
    // ------------------------------------------------------------------

    /// Resolves every currently expired session with the same outcome as the
    /// lazy path: kick, then a group-visible notice. Returns how many were
    /// resolved.
    pub async fn sweep_expired(&self) -> usize {
        let expired = self.store.sweep_expired(self.time.now());
        let count = expired.len();
        for session in expired {
            self.kick(&session.group_id, &session.member_id).await;
            self.send_group_notice(
                &session.group_id,
                &format!(
                    "Verification timed out; member {} has been removed from the group.",
                    session.member_id
                ),
            )
            .await;
            info!(
                member_id = %session.member_id,
                group_id = %session.group_id,
                "verification timed out (sweep), member removed"
            );
        }
        count
    }

    /// Spawns the periodic expiry sweep if the configuration opts in.
    ///
    /// Returns `None` under the default configuration, which keeps the
    /// documented lazy policy: expiry is only detected when the member posts
    /// again, and a member who never posts stays resident.
    pub fn spawn_sweep(self: &Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        let secs = self.config.sweep_interval_secs?;
        let service = Arc::clone(self);
        Some(tokio::spawn(sweep_task(
            service,
            Duration::from_secs(secs),
        )))
    }
}

/// Background task resolving expired sessions on a fixed interval.
pub async fn sweep_task(service: Arc<VerificationService>, interval: Duration) {
    let mut tick = tokio::time::interval(interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tick.tick().await;
        let resolved = service.sweep_expired().await;
        if resolved > 0 {
            debug!(resolved, "expiry sweep resolved sessions");
        }
    }
}

#[async_trait]
impl GroupEventHandler for VerificationService {
    async fn on_member_joined(&self, notice: &NoticeEvent) {
        // The subscriber already filters, but direct callers may not.
        if notice.kind != NoticeKind::MemberIncrease {
            return;
        }
        self.issue_challenge(notice).await;
    }

    async fn on_group_message(&self, message: &GroupMessageEvent) {
        self.screen_message(message).await;
    }
}
