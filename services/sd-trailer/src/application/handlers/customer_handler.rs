//! 客户

use std::sync::Arc;

use dealer_errors::{AppError, AppResult};
use tracing::{info, warn};

use crate::application::commands::{CreateCustomerCommand, DeleteCustomerCommand, UpdateCustomerCommand};
use crate::domain::entities::Customer;
use crate::domain::repositories::{ContractRepository, CustomerRepository};
use crate::domain::value_objects::CustomerId;

pub struct CustomerHandler {
    customer_repo: Arc<dyn CustomerRepository>,
    contract_repo: Arc<dyn ContractRepository>,
}

impl CustomerHandler {
    pub fn new(customer_repo: Arc<dyn CustomerRepository>, contract_repo: Arc<dyn ContractRepository>) -> Self {
        Self {
            customer_repo,
            contract_repo,
        }
    }

    pub async fn create_customer(&self, cmd: CreateCustomerCommand) -> AppResult<CustomerId> {
        cmd.validate()?;
        let customer = Customer::new(cmd.spec, cmd.caller.user_id())?;
        self.ensure_unique(&customer).await?;

        self.customer_repo.save(&customer).await?;
        info!(customer_id = %customer.id(), customer_type = ?customer.customer_type(), "Customer created");
        Ok(customer.id())
    }

    pub async fn get_customer(&self, customer_id: CustomerId) -> AppResult<Customer> {
        self.customer_repo
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Клиент не найден"))
    }

    pub async fn update_customer(&self, cmd: UpdateCustomerCommand) -> AppResult<()> {
        cmd.validate()?;
        let mut customer = self.get_customer(cmd.customer_id).await?;
        customer.revise(cmd.spec, cmd.caller.user_id())?;
        self.ensure_unique(&customer).await?;

        self.customer_repo.update(&customer).await?;
        info!(customer_id = %customer.id(), "Customer updated");
        Ok(())
    }

    /// 有合同引用时拒绝
    pub async fn delete_customer(&self, cmd: DeleteCustomerCommand) -> AppResult<()> {
        let customer = self.get_customer(cmd.customer_id).await?;
        let contracts = self.contract_repo.count_by_customer(customer.id()).await?;
        if contracts > 0 {
            warn!(customer_id = %customer.id(), contracts, "Customer delete rejected");
            return Err(AppError::conflict("Нельзя удалить клиента, по которому есть договоры"));
        }

        self.customer_repo.delete(customer.id()).await?;
        info!(customer_id = %customer.id(), "Customer deleted");
        Ok(())
    }

    pub async fn search_customers(&self, term: Option<&str>) -> AppResult<Vec<Customer>> {
        let term = term.map(str::trim).filter(|t| !t.is_empty());
        self.customer_repo.search(term).await
    }

    async fn ensure_unique(&self, customer: &Customer) -> AppResult<()> {
        let key = customer.identity_key().as_storage_key();
        match self.customer_repo.find_by_identity_key(&key).await? {
            Some(existing) if existing.id() != customer.id() => {
                warn!(existing_id = %existing.id(), "Duplicate customer identity");
                Err(AppError::conflict(format!(
                    "Клиент уже существует: {} ({})",
                    existing.name(),
                    existing.id()
                )))
            }
            _ => Ok(()),
        }
    }
}
