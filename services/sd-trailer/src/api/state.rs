//! HTTP 层共享状态

use std::sync::Arc;

use dealer_ports::{DocumentRenderer, RemoteSigningPort};

use crate::application::handlers::{
    CatalogHandler, ContractDocumentHandler, ContractHandler, CustomerHandler, OttsHandler, SigningCoordinator,
    SigningSettings, TrailerHandler, WarehouseHandler, WorkspaceHandler,
};
use crate::infrastructure::Persistence;

/// 所有处理器，克隆只复制 Arc
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogHandler>,
    pub trailers: Arc<TrailerHandler>,
    pub warehouses: Arc<WarehouseHandler>,
    pub otts: Arc<OttsHandler>,
    pub customers: Arc<CustomerHandler>,
    pub contracts: Arc<ContractHandler>,
    pub documents: Arc<ContractDocumentHandler>,
    pub signing: Arc<SigningCoordinator>,
    pub workspace: Arc<WorkspaceHandler>,
}

impl AppState {
    pub fn new(
        persistence: Persistence,
        renderer: Arc<dyn DocumentRenderer>,
        remote: Arc<dyn RemoteSigningPort>,
        settings: SigningSettings,
    ) -> Self {
        let Persistence {
            items,
            trailers,
            warehouses,
            customers,
            otts,
            contracts,
            uow_factory,
        } = persistence;

        let catalog = Arc::new(CatalogHandler::new(items.clone(), trailers.clone()));
        let contract_handler = Arc::new(ContractHandler::new(
            contracts.clone(),
            trailers.clone(),
            customers.clone(),
            uow_factory.clone(),
        ));
        let documents = Arc::new(ContractDocumentHandler::new(
            contracts.clone(),
            trailers.clone(),
            items,
            customers.clone(),
            otts.clone(),
            renderer,
        ));

        Self {
            trailers: Arc::new(TrailerHandler::new(
                trailers.clone(),
                warehouses.clone(),
                otts.clone(),
                contracts.clone(),
                catalog.clone(),
                uow_factory,
            )),
            warehouses: Arc::new(WarehouseHandler::new(warehouses.clone())),
            otts: Arc::new(OttsHandler::new(otts)),
            customers: Arc::new(CustomerHandler::new(customers, contracts.clone())),
            signing: Arc::new(SigningCoordinator::new(contracts, documents.clone(), remote, settings)),
            workspace: Arc::new(WorkspaceHandler::new(trailers, warehouses, contract_handler.clone())),
            catalog,
            contracts: contract_handler,
            documents,
        }
    }
}
