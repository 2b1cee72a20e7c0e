//! # Integration Test Flows
//!
//! Drives the verification subsystem the way the host dispatcher does:
//! normalized [`ChatEvent`]s enter through the subscriber adapter, and every
//! outward side effect is observed on a recording gateway.
//!
//! ## Flows Tested
//!
//! 1. **Join → DM → echo**: the full happy-path choreography
//! 2. **Timeout / mismatch laws**: failure resolution and retry semantics
//! 3. **Concurrent resolution**: racing handlers produce one outcome
//!
//! [`ChatEvent`]: chat_events::ChatEvent

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chat_events::{ChatEvent, GroupMessageEvent, NoticeEvent, NoticeKind};
    use gk_verification::testing::{
        FixedCodeGenerator, GatewayCall, MockTimeSource, RecordingGateway,
    };
    use gk_verification::{
        EventSubscriber, GatewayCapability, GatewayError, GatewayRegistry, GroupEventHandler,
        PlatformGateway, TimeSource, VerificationConfig, VerificationService,
    };

    /// Adapter that can only talk, like a platform connected without
    /// moderation rights.
    struct TextOnlyGateway;

    #[async_trait::async_trait]
    impl PlatformGateway for TextOnlyGateway {
        fn name(&self) -> &str {
            "text-only"
        }

        fn capabilities(&self) -> &[GatewayCapability] {
            &[GatewayCapability::SendMessage]
        }

        async fn send_private_message(
            &self,
            _member_id: &str,
            _text: &str,
        ) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn send_group_message(
            &self,
            _group_id: &str,
            _text: &str,
        ) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn delete_message(&self, _message_id: &str) -> Result<(), GatewayError> {
            Err(GatewayError::Rejected("no moderation rights".to_string()))
        }

        async fn remove_member(
            &self,
            _group_id: &str,
            _member_id: &str,
            _reject_rejoin: bool,
        ) -> Result<(), GatewayError> {
            Err(GatewayError::Rejected("no moderation rights".to_string()))
        }
    }

    const CODE: &str = "4286";

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Fixture {
        service: Arc<VerificationService>,
        subscriber: EventSubscriber,
        gateway: Arc<RecordingGateway>,
        clock: Arc<MockTimeSource>,
    }

    /// Builds the full stack: registry + service + subscriber, with
    /// deterministic time and codes.
    fn fixture(config: VerificationConfig) -> Fixture {
        let gateway = Arc::new(RecordingGateway::new());
        let clock = Arc::new(MockTimeSource::new(1_000));
        let registry =
            GatewayRegistry::new().register(gateway.clone() as Arc<dyn PlatformGateway>);

        let service = Arc::new(
            VerificationService::new(Arc::new(registry), config)
                .unwrap()
                .with_time_source(clock.clone() as Arc<dyn TimeSource>)
                .with_code_generator(Arc::new(FixedCodeGenerator::new(CODE))),
        );
        let subscriber = EventSubscriber::new(service.clone());

        Fixture {
            service,
            subscriber,
            gateway,
            clock,
        }
    }

    fn join_event(member: &str, group: &str) -> ChatEvent {
        ChatEvent::Notice(NoticeEvent {
            kind: NoticeKind::MemberIncrease,
            member_id: member.to_string(),
            group_id: group.to_string(),
        })
    }

    fn message_event(member: &str, group: &str, text: &str) -> ChatEvent {
        ChatEvent::GroupMessage(group_message(member, group, text))
    }

    fn group_message(member: &str, group: &str, text: &str) -> GroupMessageEvent {
        GroupMessageEvent {
            sender_id: member.to_string(),
            sender_name: format!("name-of-{member}"),
            group_id: group.to_string(),
            text: text.to_string(),
            message_id: format!("msg-{text}"),
        }
    }

    fn removals(gateway: &RecordingGateway) -> Vec<GatewayCall> {
        gateway.calls_where(|c| matches!(c, GatewayCall::RemoveMember { .. }))
    }

    fn group_notices(gateway: &RecordingGateway) -> Vec<GatewayCall> {
        gateway.calls_where(|c| matches!(c, GatewayCall::GroupMessage { .. }))
    }

    // =============================================================================
    // HAPPY PATH CHOREOGRAPHY
    // =============================================================================

    /// Spec scenario: code_length=4, timeout=2. Join, a wrong guess inside
    /// the window, then the correct code.
    #[tokio::test]
    async fn test_full_verification_choreography() {
        let f = fixture(VerificationConfig::for_testing());

        // Join: a 4-digit code is issued and delivered privately
        f.subscriber.handle(&join_event("u1", "g1")).await;
        let session = f.service.store().get("u1").unwrap();
        assert_eq!(session.code.len(), 4);

        // t+1s: wrong guess is deleted, session retained
        f.clock.advance(1_000);
        f.subscriber.handle(&message_event("u1", "g1", "0000")).await;
        assert!(f.service.store().contains("u1"));
        assert_eq!(
            f.gateway
                .calls_where(|c| matches!(c, GatewayCall::DeleteMessage { .. }))
                .len(),
            1
        );

        // t+1.5s: correct code closes the session with a welcome
        f.clock.advance(500);
        f.subscriber.handle(&message_event("u1", "g1", CODE)).await;
        assert!(f.service.store().is_empty());
        assert!(removals(&f.gateway).is_empty());

        let notices = group_notices(&f.gateway);
        assert_eq!(notices.len(), 1);
        match &notices[0] {
            GatewayCall::GroupMessage { group_id, text } => {
                assert_eq!(group_id, "g1");
                assert!(text.contains("name-of-u1"));
            }
            other => panic!("expected a group notice, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_challenge_message_carries_code_and_window() {
        let f = fixture(VerificationConfig::for_testing());

        f.subscriber.handle(&join_event("u1", "g1")).await;

        let calls = f.gateway.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            GatewayCall::PrivateMessage { member_id, text } => {
                assert_eq!(member_id, "u1");
                assert!(text.contains(CODE));
                assert!(text.contains('2'));
            }
            other => panic!("expected the challenge DM, got {other:?}"),
        }
    }

    // =============================================================================
    // FAILURE LAWS
    // =============================================================================

    /// Past the window any text kicks — the code is never even compared.
    #[tokio::test]
    async fn test_timeout_overrides_correct_code() {
        let f = fixture(VerificationConfig::for_testing());
        f.subscriber.handle(&join_event("u1", "g1")).await;

        f.clock.advance(2_001);
        f.subscriber.handle(&message_event("u1", "g1", CODE)).await;

        assert!(f.service.store().is_empty());
        let removals = removals(&f.gateway);
        assert_eq!(removals.len(), 1);
        match &removals[0] {
            GatewayCall::RemoveMember {
                group_id,
                member_id,
                reject_rejoin,
            } => {
                assert_eq!(group_id, "g1");
                assert_eq!(member_id, "u1");
                assert!(!reject_rejoin);
            }
            other => panic!("expected a removal, got {other:?}"),
        }
        // No deletion happened: the message was not treated as a mismatch
        assert!(f
            .gateway
            .calls_where(|c| matches!(c, GatewayCall::DeleteMessage { .. }))
            .is_empty());
    }

    /// A mismatch leaves the session byte-identical: same code, same
    /// issuance, so retries race against the original window.
    #[tokio::test]
    async fn test_mismatch_preserves_session_unchanged() {
        let f = fixture(VerificationConfig::for_testing());
        f.subscriber.handle(&join_event("u1", "g1")).await;
        let before = f.service.store().get("u1").unwrap();

        f.clock.advance(1_000);
        f.subscriber
            .handle(&message_event("u1", "g1", "not the code"))
            .await;

        assert_eq!(f.service.store().get("u1").unwrap(), before);
    }

    #[tokio::test]
    async fn test_rejoin_restarts_the_window() {
        let f = fixture(VerificationConfig::for_testing());
        f.subscriber.handle(&join_event("u1", "g1")).await;

        // Past the first window, the member joins again (e.g. after a kick
        // elsewhere); the fresh session must be judged by the fresh window.
        f.clock.advance(10_000);
        f.subscriber.handle(&join_event("u1", "g1")).await;
        f.clock.advance(1_000);
        f.subscriber.handle(&message_event("u1", "g1", CODE)).await;

        assert!(f.service.store().is_empty());
        assert!(removals(&f.gateway).is_empty());
    }

    // =============================================================================
    // UNRELATED TRAFFIC
    // =============================================================================

    #[tokio::test]
    async fn test_bystander_messages_trigger_nothing() {
        let f = fixture(VerificationConfig::for_testing());
        f.subscriber.handle(&join_event("u1", "g1")).await;
        let issued = f.gateway.call_count();

        f.subscriber
            .handle(&message_event("bystander", "g1", "what's this code thing?"))
            .await;

        assert_eq!(f.gateway.call_count(), issued);
        assert!(f.service.store().contains("u1"));
    }

    #[tokio::test]
    async fn test_member_decrease_notice_is_ignored() {
        let f = fixture(VerificationConfig::for_testing());

        f.subscriber
            .handle(&ChatEvent::Notice(NoticeEvent {
                kind: NoticeKind::MemberDecrease,
                member_id: "u1".to_string(),
                group_id: "g1".to_string(),
            }))
            .await;

        assert!(f.service.store().is_empty());
        assert_eq!(f.gateway.call_count(), 0);
    }

    // =============================================================================
    // CONCURRENT RESOLUTION
    // =============================================================================

    /// Two handlers racing on the same expired session: exactly one kick,
    /// exactly one notice.
    #[tokio::test]
    async fn test_concurrent_timeout_resolution_is_idempotent() {
        let f = fixture(VerificationConfig::for_testing());
        f.subscriber.handle(&join_event("u1", "g1")).await;
        f.clock.advance(2_001);

        let m_a = group_message("u1", "g1", "late");
        let m_b = group_message("u1", "g1", "also late");
        let a = f.service.on_group_message(&m_a);
        let b = f.service.on_group_message(&m_b);
        tokio::join!(a, b);

        assert!(f.service.store().is_empty());
        assert_eq!(removals(&f.gateway).len(), 1);
        assert_eq!(group_notices(&f.gateway).len(), 1);
    }

    /// Two handlers racing on the same correct code: exactly one welcome.
    #[tokio::test]
    async fn test_concurrent_success_resolution_is_idempotent() {
        let f = fixture(VerificationConfig::for_testing());
        f.subscriber.handle(&join_event("u1", "g1")).await;

        let m_a = group_message("u1", "g1", CODE);
        let m_b = group_message("u1", "g1", CODE);
        let a = f.service.on_group_message(&m_a);
        let b = f.service.on_group_message(&m_b);
        tokio::join!(a, b);

        assert!(f.service.store().is_empty());
        assert_eq!(group_notices(&f.gateway).len(), 1);
        assert!(removals(&f.gateway).is_empty());
    }

    /// Races for different members resolve independently.
    #[tokio::test]
    async fn test_members_resolve_independently() {
        let f = fixture(VerificationConfig::for_testing());
        f.subscriber.handle(&join_event("u1", "g1")).await;
        f.subscriber.handle(&join_event("u2", "g1")).await;

        let m_a = group_message("u1", "g1", CODE);
        let m_b = group_message("u2", "g1", CODE);
        let a = f.service.on_group_message(&m_a);
        let b = f.service.on_group_message(&m_b);
        tokio::join!(a, b);

        assert!(f.service.store().is_empty());
        assert_eq!(group_notices(&f.gateway).len(), 2);
    }

    // =============================================================================
    // DEGRADED GATEWAYS
    // =============================================================================

    /// With no adapter declaring the removal capability, a timeout still
    /// closes the session — the kick is a logged no-op.
    #[tokio::test]
    async fn test_timeout_without_removal_capability_still_closes_session() {
        let clock = Arc::new(MockTimeSource::new(1_000));
        let registry = GatewayRegistry::new().register(Arc::new(TextOnlyGateway));
        let service = Arc::new(
            VerificationService::new(Arc::new(registry), VerificationConfig::for_testing())
                .unwrap()
                .with_time_source(clock.clone() as Arc<dyn TimeSource>)
                .with_code_generator(Arc::new(FixedCodeGenerator::new(CODE))),
        );
        let subscriber = EventSubscriber::new(service.clone());

        subscriber.handle(&join_event("u1", "g1")).await;
        clock.advance(2_001);
        subscriber.handle(&message_event("u1", "g1", "too late")).await;

        assert!(service.store().is_empty());
    }

    // =============================================================================
    // SWEEP (OPT-IN)
    // =============================================================================

    /// The sweep resolves an expired session with the same outcome the lazy
    /// path would have produced.
    #[tokio::test]
    async fn test_sweep_matches_lazy_resolution_outcome() {
        let f = fixture(VerificationConfig::for_testing());
        f.subscriber.handle(&join_event("u1", "g1")).await;
        f.clock.advance(2_001);

        let resolved = f.service.sweep_expired().await;

        assert_eq!(resolved, 1);
        assert!(f.service.store().is_empty());
        assert_eq!(removals(&f.gateway).len(), 1);
        assert_eq!(group_notices(&f.gateway).len(), 1);
    }
}
