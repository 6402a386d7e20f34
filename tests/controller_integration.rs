//! Conversation controller integration tests
//!
//! Drive the controller against a scripted provider and check transcript
//! lifecycle, failure handling, the crisis overlay and single-flight sends.

use std::sync::Arc;
use std::time::Duration;

use oku::chat::{IgnoreReason, Role, SendOutcome, FALLBACK_REPLY, SEND_ERROR_MESSAGE};
use oku::kernel::KernelRegistry;

mod common;
use common::{controller_with, Reply, ScriptedProvider};

#[tokio::test]
async fn test_every_switch_leaves_only_the_opening_message() {
    let provider = ScriptedProvider::new();
    let controller = controller_with(&provider);
    let registry = KernelRegistry::builtin();

    for kernel in registry.all().iter().chain(registry.all().iter().rev()) {
        controller.switch_kernel(kernel).await.unwrap();
        controller.send_user_message("bonjour").await;

        controller.switch_kernel(kernel).await.unwrap();
        let transcript = controller.transcript();
        assert_eq!(transcript.len(), 1, "kernel {}", kernel.id);
        assert_eq!(transcript[0].role(), Role::Model);
        assert_eq!(transcript[0].content(), kernel.opening_message);
        assert!(!transcript[0].is_error());
    }
}

#[tokio::test]
async fn test_session_is_seeded_with_kernel_instruction_and_sampling() {
    let provider = ScriptedProvider::new();
    let controller = controller_with(&provider);
    let zen = KernelRegistry::builtin().get("zen-global").unwrap();

    controller.switch_kernel(zen).await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].system_instruction, zen.system_instruction);
    assert_eq!(requests[0].model, "test-model");
    assert_eq!(requests[0].sampling.temperature, 0.7);
    assert_eq!(requests[0].sampling.top_k, 40);
}

#[tokio::test]
async fn test_opening_message_is_never_sent() {
    let provider = ScriptedProvider::new();
    let controller = controller_with(&provider);
    let kernel = KernelRegistry::builtin().default_kernel();

    controller.switch_kernel(kernel).await.unwrap();
    controller.send_user_message("allo").await;

    assert_eq!(provider.sent(), vec!["allo".to_string()]);
}

#[tokio::test]
async fn test_empty_and_whitespace_input_are_noops() {
    let provider = ScriptedProvider::new();
    let controller = controller_with(&provider);
    controller
        .switch_kernel(KernelRegistry::builtin().default_kernel())
        .await
        .unwrap();

    for text in ["", "   ", "\n\t"] {
        assert_eq!(
            controller.send_user_message(text).await,
            SendOutcome::Ignored(IgnoreReason::Empty)
        );
    }
    assert_eq!(controller.transcript_len(), 1);
    assert!(provider.sent().is_empty());
}

#[tokio::test]
async fn test_successful_reply_is_appended_after_user_message() {
    let provider = ScriptedProvider::with_replies([Reply::Text("Respire doucement.")]);
    let controller = controller_with(&provider);
    controller
        .switch_kernel(KernelRegistry::builtin().default_kernel())
        .await
        .unwrap();

    assert_eq!(
        controller.send_user_message("je suis stressé").await,
        SendOutcome::Replied
    );

    let transcript = controller.transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1].role(), Role::User);
    assert_eq!(transcript[1].content(), "je suis stressé");
    assert_eq!(transcript[2].role(), Role::Model);
    assert_eq!(transcript[2].content(), "Respire doucement.");
}

#[tokio::test]
async fn test_message_text_is_kept_as_typed() {
    let provider = ScriptedProvider::with_replies([Reply::Text("Je suis là.")]);
    let controller = controller_with(&provider);
    controller
        .switch_kernel(KernelRegistry::builtin().default_kernel())
        .await
        .unwrap();

    let typed = "  je veux  mourir \t";
    assert_eq!(controller.send_user_message(typed).await, SendOutcome::Replied);

    assert_eq!(controller.transcript()[1].content(), typed);
    assert_eq!(provider.sent(), vec![typed.to_string()]);
    assert!(controller.crisis_visible());
}

#[tokio::test]
async fn test_empty_reply_becomes_fallback() {
    let provider = ScriptedProvider::with_replies([Reply::Text("")]);
    let controller = controller_with(&provider);
    controller
        .switch_kernel(KernelRegistry::builtin().default_kernel())
        .await
        .unwrap();

    controller.send_user_message("salut").await;

    let last = controller.transcript().pop().unwrap();
    assert_eq!(last.role(), Role::Model);
    assert_eq!(last.content(), FALLBACK_REPLY);
}

#[tokio::test]
async fn test_failed_send_adds_exactly_one_error_message() {
    let provider = ScriptedProvider::with_replies([Reply::Fail]);
    let controller = controller_with(&provider);
    controller
        .switch_kernel(KernelRegistry::builtin().default_kernel())
        .await
        .unwrap();

    assert_eq!(controller.send_user_message("salut").await, SendOutcome::Failed);

    let transcript = controller.transcript();
    assert_eq!(transcript.len(), 3);
    let error = &transcript[2];
    assert_eq!(error.role(), Role::System);
    assert!(error.is_error());
    assert_eq!(error.content(), SEND_ERROR_MESSAGE);

    // The conversation keeps working after a failure
    provider.push_reply(Reply::Text("me revoilà"));
    assert_eq!(controller.send_user_message("encore").await, SendOutcome::Replied);
    assert_eq!(controller.transcript_len(), 5);
}

#[tokio::test]
async fn test_trigger_word_raises_overlay_and_send_proceeds() {
    let provider = ScriptedProvider::with_replies([Reply::Text("Je suis là pour toi.")]);
    let controller = controller_with(&provider);
    controller
        .switch_kernel(KernelRegistry::builtin().default_kernel())
        .await
        .unwrap();
    assert!(!controller.crisis_visible());

    let outcome = controller.send_user_message("je veux mourir").await;

    assert_eq!(outcome, SendOutcome::Replied);
    assert!(controller.crisis_visible());
    assert_eq!(provider.sent(), vec!["je veux mourir".to_string()]);
    let transcript = controller.transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1].content(), "je veux mourir");
    assert_eq!(transcript[2].content(), "Je suis là pour toi.");
}

#[tokio::test]
async fn test_trigger_word_with_failed_send_still_raises_overlay() {
    let provider = ScriptedProvider::with_replies([Reply::Fail]);
    let controller = controller_with(&provider);
    controller
        .switch_kernel(KernelRegistry::builtin().default_kernel())
        .await
        .unwrap();

    assert_eq!(
        controller.send_user_message("I want to end it").await,
        SendOutcome::Failed
    );
    assert!(controller.crisis_visible());
    assert!(controller.transcript()[2].is_error());
}

#[tokio::test]
async fn test_benign_text_does_not_raise_overlay() {
    let provider = ScriptedProvider::new();
    let controller = controller_with(&provider);
    controller
        .switch_kernel(KernelRegistry::builtin().default_kernel())
        .await
        .unwrap();

    controller.send_user_message("je veux méditer").await;
    assert!(!controller.crisis_visible());
}

#[tokio::test]
async fn test_overlay_stays_until_dismissed() {
    let provider = ScriptedProvider::new();
    let controller = controller_with(&provider);
    let registry = KernelRegistry::builtin();
    controller
        .switch_kernel(registry.default_kernel())
        .await
        .unwrap();

    controller.send_user_message("je pense au suicide").await;
    controller.send_user_message("ça va mieux").await;
    controller
        .switch_kernel(registry.get("zen-global").unwrap())
        .await
        .unwrap();
    assert!(controller.crisis_visible());

    controller.dismiss_crisis();
    assert!(!controller.crisis_visible());
}

#[tokio::test]
async fn test_second_send_while_pending_is_ignored() {
    let provider = ScriptedProvider::with_replies([Reply::Text("première réponse")]).gated();
    let controller = Arc::new(controller_with(&provider));
    controller
        .switch_kernel(KernelRegistry::builtin().default_kernel())
        .await
        .unwrap();

    let c = Arc::clone(&controller);
    let first = tokio::spawn(async move { c.send_user_message("premier").await });
    provider.wait_started().await;

    assert!(controller.is_busy());
    assert_eq!(
        controller.send_user_message("deuxième").await,
        SendOutcome::Ignored(IgnoreReason::Busy)
    );
    // Opening message and the optimistic user message only
    assert_eq!(controller.transcript_len(), 2);

    provider.release();
    assert_eq!(first.await.unwrap(), SendOutcome::Replied);

    let transcript = controller.transcript();
    let contents: Vec<&str> = transcript.iter().map(|m| m.content()).collect();
    assert_eq!(contents[1..], ["premier", "première réponse"]);
    assert_eq!(provider.sent(), vec!["premier".to_string()]);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_overlay_is_raised_before_reply_arrives() {
    let provider = ScriptedProvider::new().gated();
    let controller = Arc::new(controller_with(&provider));
    controller
        .switch_kernel(KernelRegistry::builtin().default_kernel())
        .await
        .unwrap();
    let mut crisis_rx = controller.subscribe_crisis();

    let c = Arc::clone(&controller);
    let send = tokio::spawn(async move { c.send_user_message("je veux en finir").await });
    provider.wait_started().await;

    assert!(crisis_rx.has_changed().unwrap());
    assert!(*crisis_rx.borrow_and_update());

    provider.release();
    assert_eq!(send.await.unwrap(), SendOutcome::Replied);
}

#[tokio::test]
async fn test_switch_waits_for_pending_send() {
    let provider = ScriptedProvider::with_replies([Reply::Text("réponse tardive")]).gated();
    let controller = Arc::new(controller_with(&provider));
    let registry = KernelRegistry::builtin();
    controller
        .switch_kernel(registry.default_kernel())
        .await
        .unwrap();

    let c = Arc::clone(&controller);
    let send = tokio::spawn(async move { c.send_user_message("allo").await });
    provider.wait_started().await;

    let zen = registry.get("zen-global").unwrap();
    let c = Arc::clone(&controller);
    let switch = tokio::spawn(async move { c.switch_kernel(zen).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!switch.is_finished());

    provider.release();
    assert_eq!(send.await.unwrap(), SendOutcome::Replied);
    switch.await.unwrap().unwrap();

    // The late reply never lands in the new transcript
    let transcript = controller.transcript();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].content(), zen.opening_message);
    assert_eq!(controller.active_kernel().unwrap().id, "zen-global");
}

#[tokio::test]
async fn test_init_failure_leaves_empty_transcript_and_banner() {
    let provider = ScriptedProvider::new();
    provider.fail_init(true);
    let controller = controller_with(&provider);
    let kernel = KernelRegistry::builtin().default_kernel();

    assert!(controller.switch_kernel(kernel).await.is_err());
    assert_eq!(controller.transcript_len(), 0);
    assert!(controller
        .init_error()
        .unwrap()
        .contains("session init refused"));

    // Sending without a session reports the fixed error
    assert_eq!(controller.send_user_message("allo").await, SendOutcome::Failed);
    assert_eq!(controller.transcript()[1].content(), SEND_ERROR_MESSAGE);

    // A later successful switch clears the banner
    provider.fail_init(false);
    controller.switch_kernel(kernel).await.unwrap();
    assert!(controller.init_error().is_none());
    assert_eq!(controller.transcript_len(), 1);
}

#[tokio::test]
async fn test_reset_reopens_active_kernel() {
    let provider = ScriptedProvider::new();
    let controller = controller_with(&provider);
    let zen = KernelRegistry::builtin().get("zen-global").unwrap();
    controller.switch_kernel(zen).await.unwrap();
    controller.send_user_message("hello").await;

    controller.reset().await.unwrap();

    assert_eq!(controller.transcript_len(), 1);
    assert_eq!(provider.requests().len(), 2);
    assert_eq!(controller.session_status().unwrap().generation, 2);
}
