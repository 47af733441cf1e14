//! 客户实体

use chrono::NaiveDate;
use dealer_common::{non_blank, AuditInfo, UserId};
use dealer_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::domain::enums::{CustomerType, DocumentType};
use crate::domain::value_objects::CustomerId;

/// 自然人证件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDocument {
    pub doc_type: Option<DocumentType>,
    pub number: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub issuer: Option<String>,
}

impl IdentityDocument {
    pub fn is_empty(&self) -> bool {
        self.doc_type.is_none()
            && self.number.is_none()
            && self.issue_date.is_none()
            && self.issuer.is_none()
    }

    /// 合同中的证件描述
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(doc_type) = self.doc_type {
            parts.push(doc_type.title_ru().to_string());
        }
        if let Some(number) = &self.number {
            parts.push(format!("№ {}", number));
        }
        if let Some(date) = self.issue_date {
            parts.push(format!("от {}", date.format("%d.%m.%Y")));
        }
        if let Some(issuer) = &self.issuer {
            parts.push(format!("выдан {}", issuer));
        }
        parts.join(", ")
    }
}

/// 客户类型相关的数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "customer_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerKind {
    Person { document: IdentityDocument },
    Company { contact_person: Option<String> },
}

impl CustomerKind {
    pub fn customer_type(&self) -> CustomerType {
        match self {
            CustomerKind::Person { .. } => CustomerType::Person,
            CustomerKind::Company { .. } => CustomerType::Company,
        }
    }
}

/// 客户可编辑内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSpec {
    pub kind: CustomerKind,
    pub name: String,
    /// ИИН（自然人）或 БИН（法人）
    pub iin_bin: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
}

/// 客户去重键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CustomerIdentityKey {
    TaxId(String),
    PersonNamePhone { name: String, phone: Option<String> },
    CompanyName(String),
}

impl CustomerIdentityKey {
    /// 存储用的规范化字符串（数据库唯一约束列）
    pub fn as_storage_key(&self) -> String {
        match self {
            CustomerIdentityKey::TaxId(id) => format!("tax:{}", id),
            CustomerIdentityKey::PersonNamePhone { name, phone } => {
                format!("person:{}|{}", name, phone.as_deref().unwrap_or(""))
            }
            CustomerIdentityKey::CompanyName(name) => format!("company:{}", name),
        }
    }
}

/// 客户（自然人或法人）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    #[serde(flatten)]
    kind: CustomerKind,
    name: String,
    iin_bin: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    is_active: bool,
    audit_info: AuditInfo,
}

impl Customer {
    pub fn new(spec: CustomerSpec, user_id: Option<UserId>) -> AppResult<Self> {
        let mut customer = Self::restore(CustomerId::new(), spec.kind.clone(), String::new());
        customer.apply(spec)?;
        customer.audit_info = AuditInfo::new(user_id);
        Ok(customer)
    }

    pub fn restore(id: CustomerId, kind: CustomerKind, name: String) -> Self {
        Self {
            id,
            kind,
            name,
            iin_bin: None,
            phone: None,
            email: None,
            address: None,
            is_active: true,
            audit_info: AuditInfo::default(),
        }
    }

    pub fn revise(&mut self, spec: CustomerSpec, user_id: Option<UserId>) -> AppResult<()> {
        self.apply(spec)?;
        self.audit_info.update(user_id);
        Ok(())
    }

    fn apply(&mut self, spec: CustomerSpec) -> AppResult<()> {
        let name = spec.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Укажите ФИО или наименование клиента"));
        }

        self.kind = match spec.kind {
            CustomerKind::Person { document } => CustomerKind::Person {
                document: IdentityDocument {
                    doc_type: document.doc_type,
                    number: non_blank(document.number.as_deref()),
                    issue_date: document.issue_date,
                    issuer: non_blank(document.issuer.as_deref()),
                },
            },
            CustomerKind::Company { contact_person } => CustomerKind::Company {
                contact_person: non_blank(contact_person.as_deref()),
            },
        };
        self.name = name;
        self.iin_bin = non_blank(spec.iin_bin.as_deref());
        self.phone = non_blank(spec.phone.as_deref());
        self.email = non_blank(spec.email.as_deref());
        self.address = non_blank(spec.address.as_deref());
        self.is_active = spec.is_active;
        Ok(())
    }

    /// 去重键：优先税号/个人识别号，否则按类型回退到姓名（+电话）
    pub fn identity_key(&self) -> CustomerIdentityKey {
        if let Some(iin_bin) = &self.iin_bin {
            return CustomerIdentityKey::TaxId(iin_bin.clone());
        }
        let name = self.name.to_lowercase();
        match &self.kind {
            CustomerKind::Person { .. } => CustomerIdentityKey::PersonNamePhone {
                name,
                phone: self.phone.clone(),
            },
            CustomerKind::Company { .. } => CustomerIdentityKey::CompanyName(name),
        }
    }

    // ========== Getters ==========

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn kind(&self) -> &CustomerKind {
        &self.kind
    }

    pub fn customer_type(&self) -> CustomerType {
        self.kind.customer_type()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact_person(&self) -> Option<&str> {
        match &self.kind {
            CustomerKind::Company { contact_person } => contact_person.as_deref(),
            CustomerKind::Person { .. } => None,
        }
    }

    pub fn document(&self) -> Option<&IdentityDocument> {
        match &self.kind {
            CustomerKind::Person { document } if !document.is_empty() => Some(document),
            _ => None,
        }
    }

    pub fn iin_bin(&self) -> Option<&str> {
        self.iin_bin.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    // ========== Builders ==========

    pub fn with_contacts(
        mut self,
        iin_bin: Option<String>,
        phone: Option<String>,
        email: Option<String>,
        address: Option<String>,
    ) -> Self {
        self.iin_bin = iin_bin;
        self.phone = phone;
        self.email = email;
        self.address = address;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_audit_info(mut self, audit_info: AuditInfo) -> Self {
        self.audit_info = audit_info;
        self
    }

    /// 搜索：名称、联系人、税号、电话的子串（不区分大小写）
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [
            Some(self.name.as_str()),
            self.contact_person(),
            self.iin_bin(),
            self.phone(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str, iin: Option<&str>, phone: Option<&str>) -> Customer {
        Customer::new(
            CustomerSpec {
                kind: CustomerKind::Person {
                    document: IdentityDocument::default(),
                },
                name: name.to_string(),
                iin_bin: iin.map(str::to_string),
                phone: phone.map(str::to_string),
                email: None,
                address: None,
                is_active: true,
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_identity_key_prefers_tax_id() {
        let a = person("Иванов Иван", Some("900101300123"), Some("+7 701"));
        assert_eq!(
            a.identity_key(),
            CustomerIdentityKey::TaxId("900101300123".to_string())
        );
    }

    #[test]
    fn test_identity_key_fallbacks() {
        let a = person(" Иванов Иван ", None, Some("+7 701"));
        let b = person("иванов иван", None, Some("+7 701"));
        assert_eq!(a.identity_key(), b.identity_key());

        let c = person("Иванов Иван", None, Some("+7 702"));
        assert_ne!(a.identity_key(), c.identity_key());

        let company = Customer::new(
            CustomerSpec {
                kind: CustomerKind::Company {
                    contact_person: Some("  ".to_string()),
                },
                name: "ТОО Прицеп".to_string(),
                iin_bin: Some(" ".to_string()),
                phone: Some("+7 701".to_string()),
                email: None,
                address: None,
                is_active: true,
            },
            None,
        )
        .unwrap();
        assert_eq!(company.contact_person(), None);
        assert_eq!(
            company.identity_key().as_storage_key(),
            "company:тоо прицеп"
        );
    }

    #[test]
    fn test_search() {
        let a = person("Иванов Иван", Some("900101300123"), Some("+7 701 111"));
        assert!(a.matches_search("ИВАН"));
        assert!(a.matches_search("3001"));
        assert!(a.matches_search("701"));
        assert!(!a.matches_search("Петров"));
    }

    #[test]
    fn test_document_description() {
        let doc = IdentityDocument {
            doc_type: Some(DocumentType::Id),
            number: Some("044123".to_string()),
            issue_date: NaiveDate::from_ymd_opt(2020, 5, 4),
            issuer: Some("МВД РК".to_string()),
        };
        assert_eq!(
            doc.describe(),
            "Удостоверение личности, № 044123, от 04.05.2020, выдан МВД РК"
        );
    }
}
