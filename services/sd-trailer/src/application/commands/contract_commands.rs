//! 销售合同命令

use dealer_common::non_blank;
use dealer_errors::{AppError, AppResult};
use rust_decimal::Decimal;

use crate::domain::entities::ContractTerms;
use crate::domain::value_objects::{CallerIdentity, ContractId, TrailerId};

/// 创建合同命令
///
/// 编号为空时自动生成
#[derive(Debug, Clone)]
pub struct CreateContractCommand {
    pub caller: CallerIdentity,
    pub trailer_id: TrailerId,
    pub contract_number: Option<String>,
    pub terms: ContractTerms,
}

impl CreateContractCommand {
    pub fn validate(&self) -> AppResult<()> {
        validate_terms(&self.terms)
    }

    pub fn normalized_number(&self) -> Option<String> {
        non_blank(self.contract_number.as_deref())
    }
}

/// 编辑合同命令
///
/// 编号为空时保持为空（不自动生成）
#[derive(Debug, Clone)]
pub struct UpdateContractCommand {
    pub contract_id: ContractId,
    pub caller: CallerIdentity,
    pub trailer_id: TrailerId,
    pub contract_number: Option<String>,
    pub terms: ContractTerms,
}

impl UpdateContractCommand {
    pub fn validate(&self) -> AppResult<()> {
        validate_terms(&self.terms)
    }

    pub fn normalized_number(&self) -> Option<String> {
        non_blank(self.contract_number.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct DeleteContractCommand {
    pub contract_id: ContractId,
    pub caller: CallerIdentity,
}

fn validate_terms(terms: &ContractTerms) -> AppResult<()> {
    if terms.price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(AppError::validation("Сумма договора не может быть отрицательной"));
    }
    Ok(())
}
