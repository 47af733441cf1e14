//! OTTS（车辆型式认证）实体

use chrono::NaiveDate;
use dealer_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::OttsId;

/// OTTS 可编辑内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OttsSpec {
    pub number: String,
    pub date: Option<NaiveDate>,
    /// 车型修改码（如 "002"）
    pub modification: String,
    pub name: String,
    pub axle_count: i32,
    pub full_mass_kg: Option<i32>,
    pub is_active: bool,
}

/// OTTS 证书
///
/// 按修改码与挂车关联，用于在合同中补全轴数和总质量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Otts {
    id: OttsId,
    number: String,
    date: Option<NaiveDate>,
    modification: String,
    name: String,
    axle_count: i32,
    full_mass_kg: Option<i32>,
    is_active: bool,
}

impl Otts {
    pub fn new(spec: OttsSpec) -> AppResult<Self> {
        let mut otts = Self::restore(OttsId::new(), spec.clone());
        otts.revise(spec)?;
        Ok(otts)
    }

    /// 从存储恢复，不做校验
    pub fn restore(id: OttsId, spec: OttsSpec) -> Self {
        Self {
            id,
            number: spec.number,
            date: spec.date,
            modification: spec.modification,
            name: spec.name,
            axle_count: spec.axle_count,
            full_mass_kg: spec.full_mass_kg,
            is_active: spec.is_active,
        }
    }

    pub fn revise(&mut self, spec: OttsSpec) -> AppResult<()> {
        let number = required(&spec.number, "Укажите номер ОТТС")?;
        let modification = required(&spec.modification, "Укажите модификацию")?;
        let name = required(&spec.name, "Укажите наименование")?;
        if spec.axle_count <= 0 {
            return Err(AppError::validation("Количество осей должно быть больше нуля"));
        }

        self.number = number;
        self.date = spec.date;
        self.modification = modification;
        self.name = name;
        self.axle_count = spec.axle_count;
        self.full_mass_kg = spec.full_mass_kg;
        self.is_active = spec.is_active;
        Ok(())
    }

    pub fn id(&self) -> OttsId {
        self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn modification(&self) -> &str {
        &self.modification
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axle_count(&self) -> i32 {
        self.axle_count
    }

    pub fn full_mass_kg(&self) -> Option<i32> {
        self.full_mass_kg
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

fn required(value: &str, message: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(message));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_trimmed() {
        let otts = Otts::new(OttsSpec {
            number: " KZ.7500.01 ".to_string(),
            modification: " 002 ".to_string(),
            name: " МЗСА 817 ".to_string(),
            axle_count: 1,
            full_mass_kg: Some(750),
            is_active: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(otts.number(), "KZ.7500.01");
        assert_eq!(otts.modification(), "002");
        assert_eq!(otts.name(), "МЗСА 817");
    }

    #[test]
    fn test_required_fields() {
        let result = Otts::new(OttsSpec {
            number: "1".to_string(),
            modification: " ".to_string(),
            name: "x".to_string(),
            axle_count: 1,
            ..Default::default()
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
