//! 远程签名流程测试

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use common::{ScriptedSigning, TestApp};
use dealer_errors::{AppError, AppResult};
use dealer_ports::{
    DdcOptions, DocumentRegistration, QrOperationStatus, QrSigningRequest, RemoteSigningPort, SignatureSubmission,
};
use sd_trailer::application::commands::{AddOrgSignatureCommand, SigningStepCommand};
use sd_trailer::application::handlers::{SigningCoordinator, SigningSettings};
use sd_trailer::domain::entities::{ContractTerms, SigningState};
use sd_trailer::domain::repositories::ContractRepository;
use sd_trailer::domain::value_objects::{CallerIdentity, ContractId};

async fn app_with_contract() -> (TestApp, ContractId) {
    let app = TestApp::new();
    let wh = app.seed_catalog().await;
    let trailer = app.trailer("Y3KA00002R0000001", wh).await;
    let contract_id = app.contract(trailer, Some("15"), ContractTerms::default()).await;
    (app, contract_id)
}

fn step(contract_id: ContractId) -> SigningStepCommand {
    SigningStepCommand {
        contract_id,
        caller: CallerIdentity::admin(None),
    }
}

fn org_signature(contract_id: ContractId, signature: &str) -> AddOrgSignatureCommand {
    AddOrgSignatureCommand {
        contract_id,
        caller: CallerIdentity::admin(None),
        signature: signature.to_string(),
        sign_type: None,
    }
}

#[tokio::test]
async fn test_preregister_is_idempotent() {
    let (app, contract_id) = app_with_contract().await;

    let first = app.state.signing.preregister(step(contract_id)).await.unwrap();
    let second = app.state.signing.preregister(step(contract_id)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(app.remote.count("register"), 1);
    assert_eq!(app.remote.count("upload"), 1);
    assert_eq!(app.renderer.renders(), 1);

    let registration = &app.remote.registrations()[0];
    assert_eq!(registration.title, "Договор_15.pdf");
    assert_eq!(registration.settings.signatures_limit, 2);
    assert!(!registration.settings.private);

    let contract = app.state.contracts.get_contract(contract_id).await.unwrap();
    assert_eq!(contract.signing().document_id(), Some(first.as_str()));
    assert!(contract.signing().expire_at().is_some());
}

#[tokio::test]
async fn test_steps_before_registration_make_no_remote_calls() {
    let (app, contract_id) = app_with_contract().await;

    let err = app.state.signing.poll_qr_status(step(contract_id)).await.unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));

    let err = app.state.signing.start_qr(step(contract_id)).await.unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));

    let err = app
        .state
        .signing
        .add_org_signature(org_signature(contract_id, "MIAGCSqG"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));

    let err = app.state.signing.signed_card(step(contract_id)).await.unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));

    assert!(app.remote.calls().is_empty());
}

#[tokio::test]
async fn test_poll_without_operation_is_rejected() {
    let (app, contract_id) = app_with_contract().await;
    app.state.signing.preregister(step(contract_id)).await.unwrap();

    let err = app.state.signing.poll_qr_status(step(contract_id)).await.unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));
    assert_eq!(app.remote.count("qr_status"), 0);
}

#[tokio::test]
async fn test_empty_signature_is_rejected_locally() {
    let (app, contract_id) = app_with_contract().await;
    app.state.signing.preregister(step(contract_id)).await.unwrap();

    let err = app
        .state
        .signing
        .add_org_signature(org_signature(contract_id, "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(app.remote.count("add_signature"), 0);
}

#[tokio::test]
async fn test_qr_timeout_leaves_state_unchanged() {
    let (app, contract_id) = app_with_contract().await;
    app.state.signing.preregister(step(contract_id)).await.unwrap();
    let before = app.state.contracts.get_contract(contract_id).await.unwrap();

    app.remote.fail_qr_start(true);
    let err = app.state.signing.start_qr(step(contract_id)).await.unwrap_err();
    assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    assert!(err.is_retryable());

    let after = app.state.contracts.get_contract(contract_id).await.unwrap();
    assert_eq!(after.signing(), before.signing());

    app.remote.fail_qr_start(false);
    let operation_id = app.state.signing.start_qr(step(contract_id)).await.unwrap();
    assert_eq!(operation_id, "op-1");
}

#[tokio::test]
async fn test_full_signing_flow() {
    let (app, contract_id) = app_with_contract().await;
    let document_id = app.state.signing.preregister(step(contract_id)).await.unwrap();

    let sign_id = app
        .state
        .signing
        .add_org_signature(org_signature(contract_id, "MIAGCSqG"))
        .await
        .unwrap();
    assert_eq!(sign_id, 11);

    app.state.signing.start_qr(step(contract_id)).await.unwrap();

    let pending = app.state.signing.poll_qr_status(step(contract_id)).await.unwrap();
    assert_eq!(pending.state().tag(), SigningState::QR_STARTED);
    assert_eq!(pending.last_status(), Some("pending"));

    app.remote.set_qr_status("done", Some(42));
    let done = app.state.signing.poll_qr_status(step(contract_id)).await.unwrap();
    assert_eq!(
        done.state(),
        &SigningState::Done {
            document_id: document_id.clone(),
            operation_id: "op-1".to_string(),
            sign_id: Some(42),
        }
    );
    assert_eq!(done.last_sign_id(), Some(42));

    let stored = app.state.contracts.get_contract(contract_id).await.unwrap();
    assert_eq!(stored.signing(), &done);

    // 完成后不能再次发起二维码签名，但可以继续轮询
    let err = app.state.signing.start_qr(step(contract_id)).await.unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));
    app.state.signing.poll_qr_status(step(contract_id)).await.unwrap();

    let card = app.state.signing.signed_card(step(contract_id)).await.unwrap();
    assert_eq!(card.file_name, "ddc_15.pdf");
    assert_eq!(card.bytes, b"%PDF-ddc".to_vec());
    let options = app.remote.last_ddc_options().unwrap();
    assert_eq!(options.file_name, "Договор_15.pdf");
    assert!(options.with_label_verified);
    assert!(!options.without_document_visualization);
    assert_eq!(options.language, "ru");
}

#[tokio::test]
async fn test_downloaded_pdf_matches_registered_document() {
    let (app, contract_id) = app_with_contract().await;

    let download = app.state.documents.contract_pdf(contract_id).await.unwrap();
    let again = app.state.documents.contract_pdf(contract_id).await.unwrap();
    assert_eq!(download.bytes, again.bytes);
    assert_eq!(download.file_name, "contract_15.pdf");

    let encoded = app.state.documents.contract_pdf_base64(contract_id).await.unwrap();
    assert!(!encoded.is_empty());
}

#[tokio::test]
async fn test_unknown_contract_is_not_found() {
    let app = TestApp::new();
    let err = app.state.signing.preregister(step(ContractId::new())).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(app.remote.calls().is_empty());
}

// ========== 轮询与重新发起交错 ==========

/// 轮询请求在途时，另一个请求重新发起了二维码签名并已保存新操作
struct RestartDuringPoll {
    inner: Arc<ScriptedSigning>,
    contracts: Arc<dyn ContractRepository>,
    contract_id: ContractId,
    restarted: AtomicBool,
}

#[async_trait]
impl RemoteSigningPort for RestartDuringPoll {
    async fn register_document(&self, request: &DocumentRegistration) -> AppResult<String> {
        self.inner.register_document(request).await
    }

    async fn upload_document_data(&self, document_id: &str, data: Vec<u8>) -> AppResult<()> {
        self.inner.upload_document_data(document_id, data).await
    }

    async fn add_signature(&self, document_id: &str, submission: &SignatureSubmission) -> AppResult<i64> {
        self.inner.add_signature(document_id, submission).await
    }

    async fn start_qr_signing(&self, document_id: &str, request: &QrSigningRequest) -> AppResult<String> {
        self.inner.start_qr_signing(document_id, request).await
    }

    async fn qr_operation_status(&self, document_id: &str, operation_id: &str) -> AppResult<QrOperationStatus> {
        if !self.restarted.swap(true, Ordering::SeqCst) {
            let contract = self.contracts.find_by_id(self.contract_id).await?.unwrap();
            let mut signing = contract.signing().clone();
            signing.start_qr("op-2".to_string()).unwrap();
            self.contracts
                .update_signing(self.contract_id, Some(operation_id), &signing)
                .await?;
        }
        self.inner.qr_operation_status(document_id, operation_id).await
    }

    async fn build_ddc(&self, document_id: &str, options: &DdcOptions) -> AppResult<Vec<u8>> {
        self.inner.build_ddc(document_id, options).await
    }
}

#[tokio::test]
async fn test_stale_poll_does_not_overwrite_restarted_operation() {
    let (app, contract_id) = app_with_contract().await;
    app.state.signing.preregister(step(contract_id)).await.unwrap();
    app.state.signing.start_qr(step(contract_id)).await.unwrap();
    app.remote.set_qr_status("done", Some(42));

    let coordinator = SigningCoordinator::new(
        app.persistence.contracts.clone(),
        app.state.documents.clone(),
        Arc::new(RestartDuringPoll {
            inner: app.remote.clone(),
            contracts: app.persistence.contracts.clone(),
            contract_id,
            restarted: AtomicBool::new(false),
        }),
        SigningSettings::default(),
    );

    let err = coordinator.poll_qr_status(step(contract_id)).await.unwrap_err();
    assert!(matches!(&err, AppError::Conflict(msg) if msg.starts_with("Конфликт сохранения")));
    assert!(err.is_retryable());

    let stored = app.state.contracts.get_contract(contract_id).await.unwrap();
    assert_eq!(stored.signing().state().tag(), SigningState::QR_STARTED);
    assert_eq!(stored.signing().operation_id(), Some("op-2"));
    assert_eq!(stored.signing().last_sign_id(), None);

    // 重新读取后轮询的是新操作
    let refreshed = coordinator.poll_qr_status(step(contract_id)).await.unwrap();
    assert_eq!(refreshed.operation_id(), Some("op-2"));
    assert_eq!(refreshed.last_sign_id(), Some(42));
}
