//! 集成测试公共设施：内存存储、手写的远程签名与渲染替身

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dealer_errors::{AppError, AppResult};
use dealer_ports::{
    DdcOptions, DocumentRegistration, DocumentRenderer, QrOperationStatus, QrSigningRequest,
    RemoteSigningPort, SignatureSubmission,
};
use sd_trailer::api::AppState;
use sd_trailer::application::commands::{
    CreateContractCommand, CreateItemCommand, CreateTrailerCommand, CreateWarehouseCommand,
};
use sd_trailer::application::handlers::SigningSettings;
use sd_trailer::application::queries::ModelSelection;
use sd_trailer::domain::entities::{ContractTerms, ItemSpec};
use sd_trailer::domain::enums::{ItemType, TrailerStatus};
use sd_trailer::domain::value_objects::{CallerIdentity, ContractId, ItemId, TrailerId, WarehouseId};
use sd_trailer::infrastructure::memory::InMemoryStore;
use sd_trailer::infrastructure::Persistence;

// ========== 远程签名替身 ==========

/// 按脚本应答的远程签名服务，记录每次调用
pub struct ScriptedSigning {
    calls: Mutex<Vec<&'static str>>,
    qr_status: Mutex<QrOperationStatus>,
    ddc_options: Mutex<Option<DdcOptions>>,
    registrations: Mutex<Vec<DocumentRegistration>>,
    fail_qr_start: AtomicBool,
    documents: AtomicUsize,
}

impl Default for ScriptedSigning {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            qr_status: Mutex::new(QrOperationStatus {
                status: "pending".to_string(),
                sign_id: None,
            }),
            ddc_options: Mutex::new(None),
            registrations: Mutex::new(Vec::new()),
            fail_qr_start: AtomicBool::new(false),
            documents: AtomicUsize::new(0),
        }
    }
}

impl ScriptedSigning {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    pub fn set_qr_status(&self, status: &str, sign_id: Option<i64>) {
        *self.qr_status.lock().unwrap() = QrOperationStatus {
            status: status.to_string(),
            sign_id,
        };
    }

    /// 发起二维码签名时模拟超时
    pub fn fail_qr_start(&self, fail: bool) {
        self.fail_qr_start.store(fail, Ordering::SeqCst);
    }

    pub fn last_ddc_options(&self) -> Option<DdcOptions> {
        self.ddc_options.lock().unwrap().clone()
    }

    pub fn registrations(&self) -> Vec<DocumentRegistration> {
        self.registrations.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteSigningPort for ScriptedSigning {
    async fn register_document(&self, request: &DocumentRegistration) -> AppResult<String> {
        self.record("register");
        self.registrations.lock().unwrap().push(request.clone());
        let n = self.documents.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("doc-{}", n))
    }

    async fn upload_document_data(&self, _document_id: &str, _data: Vec<u8>) -> AppResult<()> {
        self.record("upload");
        Ok(())
    }

    async fn add_signature(&self, _document_id: &str, _submission: &SignatureSubmission) -> AppResult<i64> {
        self.record("add_signature");
        Ok(11)
    }

    async fn start_qr_signing(&self, _document_id: &str, _request: &QrSigningRequest) -> AppResult<String> {
        self.record("start_qr");
        if self.fail_qr_start.load(Ordering::SeqCst) {
            return Err(AppError::upstream_unavailable("SIGEX: request timed out"));
        }
        Ok("op-1".to_string())
    }

    async fn qr_operation_status(&self, _document_id: &str, _operation_id: &str) -> AppResult<QrOperationStatus> {
        self.record("qr_status");
        Ok(self.qr_status.lock().unwrap().clone())
    }

    async fn build_ddc(&self, _document_id: &str, options: &DdcOptions) -> AppResult<Vec<u8>> {
        self.record("ddc");
        *self.ddc_options.lock().unwrap() = Some(options.clone());
        Ok(b"%PDF-ddc".to_vec())
    }
}

// ========== 渲染替身 ==========

/// 把上下文序列化为字节，记录渲染次数
#[derive(Default)]
pub struct CountingRenderer {
    renders: AtomicUsize,
}

impl CountingRenderer {
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl DocumentRenderer for CountingRenderer {
    fn render_pdf(&self, template: &str, context: &serde_json::Value) -> AppResult<Vec<u8>> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        let mut bytes = format!("%PDF-{}:", template).into_bytes();
        bytes.extend(context.to_string().into_bytes());
        Ok(bytes)
    }
}

// ========== 测试应用 ==========

pub struct TestApp {
    pub store: InMemoryStore,
    pub persistence: Persistence,
    pub state: AppState,
    pub remote: Arc<ScriptedSigning>,
    pub renderer: Arc<CountingRenderer>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(InMemoryStore::new())
    }

    pub fn with_store(store: InMemoryStore) -> Self {
        let persistence = Persistence::in_memory(&store);
        let remote = Arc::new(ScriptedSigning::default());
        let renderer = Arc::new(CountingRenderer::default());
        let state = AppState::new(
            persistence.clone(),
            renderer.clone(),
            remote.clone(),
            SigningSettings::default(),
        );
        Self {
            store,
            persistence,
            state,
            remote,
            renderer,
        }
    }

    pub async fn warehouse(&self, name: &str) -> WarehouseId {
        self.state
            .warehouses
            .create_warehouse(CreateWarehouseCommand {
                caller: CallerIdentity::admin(None),
                name: name.to_string(),
                is_active: true,
            })
            .await
            .unwrap()
    }

    pub async fn item(&self, spec: ItemSpec) -> ItemId {
        self.state
            .catalog
            .create_item(CreateItemCommand {
                caller: CallerIdentity::admin(None),
                spec,
            })
            .await
            .unwrap()
    }

    /// 入库一辆标准型号的挂车
    pub async fn trailer(&self, vin: &str, warehouse_id: WarehouseId) -> TrailerId {
        self.state
            .trailers
            .create_trailer(CreateTrailerCommand {
                caller: CallerIdentity::admin(None),
                vin: vin.to_string(),
                model: standard_selection(),
                warehouse_id,
                manufacture_date: None,
                status: TrailerStatus::InStock,
                comment: None,
            })
            .await
            .unwrap()
    }

    pub async fn contract(&self, trailer_id: TrailerId, number: Option<&str>, terms: ContractTerms) -> ContractId {
        self.state
            .contracts
            .create_contract(CreateContractCommand {
                caller: CallerIdentity::admin(None),
                trailer_id,
                contract_number: number.map(str::to_string),
                terms,
            })
            .await
            .unwrap()
    }

    /// 仓库 + 标准型号，返回仓库 ID
    pub async fn seed_catalog(&self) -> WarehouseId {
        self.item(trailer_spec("MZSA-817", None)).await;
        self.warehouse("Алматы").await
    }

    pub async fn trailer_status(&self, trailer_id: TrailerId) -> TrailerStatus {
        self.state.trailers.get_trailer(trailer_id).await.unwrap().status()
    }
}

/// 标准挂车型号：3000x1500，1 轴，R13，борт 400，带导向轮
pub fn trailer_spec(article: &str, tent_height_mm: Option<i32>) -> ItemSpec {
    ItemSpec {
        item_type: Some(ItemType::Trailer),
        article: Some(article.to_string()),
        name: format!("Прицеп {}", article),
        board_height_mm: Some(400),
        axle_count: Some(1),
        wheel_radius: Some("R13".to_string()),
        tent_height_mm,
        has_jockey_wheel: Some(true),
        size_body: Some("3000x1500".to_string()),
        is_active: true,
        ..Default::default()
    }
}

pub fn standard_selection() -> ModelSelection {
    ModelSelection {
        size_body: Some("3000x1500".to_string()),
        axle_count: Some(1),
        wheel_radius: Some("R13".to_string()),
        board_height_mm: Some("400".to_string()),
        jockey_wheel: true,
        tent_height_mm: None,
    }
}
