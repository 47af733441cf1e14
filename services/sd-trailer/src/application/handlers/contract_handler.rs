//! 合同生命周期
//!
//! 合同与挂车状态在同一个工作单元中修改。预检查只是快速路径，
//! 存储层唯一约束才是最终裁决，提交时的冲突统一转换为可重试的 Conflict。

use std::collections::HashMap;
use std::sync::Arc;

use dealer_adapter_postgres::is_unique_violation_of;
use dealer_errors::{AppError, AppResult};
use metrics::counter;
use tracing::{info, warn};

use crate::application::commands::{CreateContractCommand, DeleteContractCommand, UpdateContractCommand};
use crate::application::queries::{ContractView, ListContractsQuery};
use crate::domain::entities::{ContractFilter, SalesContract, Trailer, TrailerFilter};
use crate::domain::repositories::{ContractRepository, CustomerRepository, TrailerRepository};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::value_objects::{next_contract_number, CallerIdentity, ContractId, CustomerId, TrailerId};

/// 挂车唯一约束
pub const TRAILER_CONSTRAINT: &str = "uq_sales_contract_trailer";
/// 合同编号唯一约束
pub const NUMBER_CONSTRAINT: &str = "uq_sales_contract_number";

const TRAILER_RACE_MESSAGE: &str =
    "Конфликт сохранения (прицеп уже занят другим договором). Обнови страницу и попробуй снова.";
const NUMBER_RACE_MESSAGE: &str =
    "Такой номер договора уже существует. Обнови страницу и попробуй снова.";
const GENERIC_RACE_MESSAGE: &str = "Конфликт сохранения. Обнови страницу и попробуй снова.";

pub struct ContractHandler {
    contract_repo: Arc<dyn ContractRepository>,
    trailer_repo: Arc<dyn TrailerRepository>,
    customer_repo: Arc<dyn CustomerRepository>,
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl ContractHandler {
    pub fn new(
        contract_repo: Arc<dyn ContractRepository>,
        trailer_repo: Arc<dyn TrailerRepository>,
        customer_repo: Arc<dyn CustomerRepository>,
        uow_factory: Arc<dyn UnitOfWorkFactory>,
    ) -> Self {
        Self {
            contract_repo,
            trailer_repo,
            customer_repo,
            uow_factory,
        }
    }

    /// 创建合同，挂车同时变为 SOLD
    pub async fn create_contract(&self, cmd: CreateContractCommand) -> AppResult<ContractId> {
        cmd.validate()?;
        info!(trailer_id = %cmd.trailer_id, "Creating contract");

        let uow = self.uow_factory.begin().await?;
        let result = Self::create_in(uow.as_ref(), &cmd).await;
        let contract_id = finish("create", uow, result).await?;

        info!(contract_id = %contract_id, trailer_id = %cmd.trailer_id, "Contract created");
        Ok(contract_id)
    }

    async fn create_in(uow: &dyn UnitOfWork, cmd: &CreateContractCommand) -> AppResult<ContractId> {
        let mut trailer = load_trailer(uow, cmd.trailer_id).await?;

        if uow.contracts().count_by_trailer(trailer.id(), None).await? > 0 {
            warn!(trailer_id = %trailer.id(), "Trailer already has a contract");
            return Err(AppError::conflict("На этот прицеп уже существует договор."));
        }
        if trailer.status().is_sold() {
            return Err(AppError::invalid_state("Этот прицеп уже продан"));
        }
        ensure_customer(uow, cmd.terms.customer_id).await?;

        let number = match cmd.normalized_number() {
            Some(number) => number,
            None => {
                let existing = uow.contracts().contract_numbers().await?;
                next_contract_number(existing.iter().map(String::as_str))
            }
        };
        ensure_number_free(uow, &number, None).await?;

        let contract = SalesContract::new(number, trailer.id(), cmd.terms.clone(), cmd.caller.user_id());
        let previous = trailer.status();
        trailer.mark_sold(cmd.caller.user_id());

        uow.contracts().save(&contract).await?;
        uow.trailers().update_status(&trailer, previous).await?;
        Ok(contract.id())
    }

    /// 编辑合同；换车时旧挂车在无合同引用后恢复为 IN_STOCK
    pub async fn update_contract(&self, cmd: UpdateContractCommand) -> AppResult<()> {
        cmd.validate()?;

        let uow = self.uow_factory.begin().await?;
        let result = Self::update_in(uow.as_ref(), &cmd).await;
        finish("update", uow, result).await?;

        info!(contract_id = %cmd.contract_id, trailer_id = %cmd.trailer_id, "Contract updated");
        Ok(())
    }

    async fn update_in(uow: &dyn UnitOfWork, cmd: &UpdateContractCommand) -> AppResult<()> {
        let mut contract = load_contract(uow, cmd.contract_id).await?;
        let old_trailer_id = contract.trailer_id();
        let mut new_trailer = load_trailer(uow, cmd.trailer_id).await?;

        if uow
            .contracts()
            .count_by_trailer(new_trailer.id(), Some(contract.id()))
            .await?
            > 0
        {
            warn!(contract_id = %contract.id(), trailer_id = %new_trailer.id(), "Target trailer is taken");
            return Err(AppError::conflict("На выбранный прицеп уже существует другой договор."));
        }

        let number = cmd.normalized_number();
        if let Some(number) = &number {
            ensure_number_free(uow, number, Some(contract.id())).await?;
        }
        ensure_customer(uow, cmd.terms.customer_id).await?;

        contract.revise(number, new_trailer.id(), cmd.terms.clone(), cmd.caller.user_id());
        uow.contracts().update(&contract).await?;

        if old_trailer_id != new_trailer.id() {
            release_if_free(uow, old_trailer_id, &cmd.caller).await?;
        }

        let previous = new_trailer.status();
        new_trailer.mark_sold(cmd.caller.user_id());
        uow.trailers().update_status(&new_trailer, previous).await?;
        Ok(())
    }

    /// 删除合同；挂车在无其他合同引用时恢复为 IN_STOCK
    pub async fn delete_contract(&self, cmd: DeleteContractCommand) -> AppResult<()> {
        let uow = self.uow_factory.begin().await?;
        let result = Self::delete_in(uow.as_ref(), &cmd).await;
        let trailer_id = finish("delete", uow, result).await?;

        info!(contract_id = %cmd.contract_id, trailer_id = %trailer_id, "Contract deleted");
        Ok(())
    }

    async fn delete_in(uow: &dyn UnitOfWork, cmd: &DeleteContractCommand) -> AppResult<TrailerId> {
        let contract = load_contract(uow, cmd.contract_id).await?;
        let trailer_id = contract.trailer_id();

        uow.contracts().delete(contract.id()).await?;
        release_if_free(uow, trailer_id, &cmd.caller).await?;
        Ok(trailer_id)
    }

    pub async fn get_contract(&self, contract_id: ContractId) -> AppResult<SalesContract> {
        self.contract_repo
            .find_by_id(contract_id)
            .await?
            .ok_or_else(contract_not_found)
    }

    /// 下一个建议编号（表单预填）
    pub async fn next_contract_number(&self) -> AppResult<String> {
        let existing = self.contract_repo.contract_numbers().await?;
        Ok(next_contract_number(existing.iter().map(String::as_str)))
    }

    pub async fn list_contracts(&self, query: ListContractsQuery) -> AppResult<Vec<ContractView>> {
        self.contract_views(&query.to_filter()).await
    }

    /// 合同附带挂车和客户名称
    pub(crate) async fn contract_views(&self, filter: &ContractFilter) -> AppResult<Vec<ContractView>> {
        let contracts = self.contract_repo.list(filter).await?;
        if contracts.is_empty() {
            return Ok(Vec::new());
        }

        let mut trailers: HashMap<TrailerId, _> = self
            .trailer_repo
            .list(&TrailerFilter::default())
            .await?
            .into_iter()
            .map(|summary| (summary.trailer.id(), summary))
            .collect();
        let customers: HashMap<CustomerId, String> = self
            .customer_repo
            .search(None)
            .await?
            .into_iter()
            .map(|customer| (customer.id(), customer.name().to_string()))
            .collect();

        Ok(contracts
            .into_iter()
            .map(|contract| ContractView {
                trailer: trailers.remove(&contract.trailer_id()),
                customer_name: contract
                    .customer_id()
                    .and_then(|id| customers.get(&id).cloned()),
                contract,
            })
            .collect())
    }
}

/// 成功则提交，失败则回滚；冲突转换为友好的重试提示
async fn finish<T>(operation: &'static str, uow: Box<dyn UnitOfWork>, result: AppResult<T>) -> AppResult<T> {
    let outcome = match result {
        Ok(value) => uow.commit().await.map(|_| value),
        Err(e) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
    .map_err(friendly_conflict);

    let label = match &outcome {
        Ok(_) => "ok",
        Err(AppError::Conflict(_)) => "conflict",
        Err(_) => "error",
    };
    counter!("contract_lifecycle_total", "operation" => operation, "outcome" => label).increment(1);
    outcome
}

/// 存储层唯一约束冲突 → 可重试提示；业务预检查的消息原样保留
fn friendly_conflict(err: AppError) -> AppError {
    if is_unique_violation_of(&err, TRAILER_CONSTRAINT) {
        warn!("Concurrent contract for the same trailer");
        AppError::conflict(TRAILER_RACE_MESSAGE)
    } else if is_unique_violation_of(&err, NUMBER_CONSTRAINT) {
        warn!("Concurrent contract number");
        AppError::conflict(NUMBER_RACE_MESSAGE)
    } else if matches!(&err, AppError::Conflict(msg) if msg.starts_with("unique constraint")) {
        AppError::conflict(GENERIC_RACE_MESSAGE)
    } else {
        err
    }
}

fn contract_not_found() -> AppError {
    AppError::not_found("Договор не найден")
}

async fn load_contract(uow: &dyn UnitOfWork, id: ContractId) -> AppResult<SalesContract> {
    uow.contracts().find_by_id(id).await?.ok_or_else(contract_not_found)
}

async fn load_trailer(uow: &dyn UnitOfWork, id: TrailerId) -> AppResult<Trailer> {
    uow.trailers()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Прицеп не найден"))
}

async fn ensure_customer(uow: &dyn UnitOfWork, customer_id: Option<CustomerId>) -> AppResult<()> {
    if let Some(id) = customer_id
        && uow.customers().find_by_id(id).await?.is_none()
    {
        return Err(AppError::validation("Клиент не найден"));
    }
    Ok(())
}

async fn ensure_number_free(uow: &dyn UnitOfWork, number: &str, exclude: Option<ContractId>) -> AppResult<()> {
    if uow.contracts().number_exists(number, exclude).await? {
        warn!(number, "Duplicate contract number");
        return Err(AppError::validation(format!(
            "Такой номер договора уже существует ({}). Введите другой.",
            number
        )));
    }
    Ok(())
}

/// 没有合同引用时挂车恢复为 IN_STOCK
async fn release_if_free(uow: &dyn UnitOfWork, trailer_id: TrailerId, caller: &CallerIdentity) -> AppResult<()> {
    let remaining = uow.contracts().count_by_trailer(trailer_id, None).await?;
    if remaining > 0 {
        info!(trailer_id = %trailer_id, remaining, "Trailer still referenced, keeping SOLD");
        return Ok(());
    }
    if let Some(mut trailer) = uow.trailers().find_by_id(trailer_id).await? {
        let previous = trailer.status();
        trailer.release(caller.user_id());
        uow.trailers().update_status(&trailer, previous).await?;
    }
    Ok(())
}
