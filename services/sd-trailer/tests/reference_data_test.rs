//! 客户、仓库和 OTTS 证书测试

mod common;

use chrono::NaiveDate;
use common::{standard_selection, TestApp};
use dealer_errors::{AppError, AppResult};
use sd_trailer::application::commands::{
    CreateCustomerCommand, CreateOttsCommand, CreateTrailerCommand, CreateWarehouseCommand,
    DeleteCustomerCommand, DeleteOttsCommand, SetWarehouseActiveCommand, UpdateCustomerCommand,
};
use sd_trailer::domain::entities::{ContractTerms, CustomerKind, CustomerSpec, IdentityDocument, OttsSpec};
use sd_trailer::domain::enums::{DocumentType, TrailerStatus};
use sd_trailer::domain::value_objects::{CallerIdentity, CustomerId};

fn person(name: &str, iin: Option<&str>, phone: Option<&str>) -> CustomerSpec {
    CustomerSpec {
        kind: CustomerKind::Person {
            document: IdentityDocument {
                doc_type: Some(DocumentType::Id),
                number: Some("044123".to_string()),
                issue_date: NaiveDate::from_ymd_opt(2020, 5, 4),
                issuer: Some("МВД РК".to_string()),
            },
        },
        name: name.to_string(),
        iin_bin: iin.map(str::to_string),
        phone: phone.map(str::to_string),
        email: None,
        address: None,
        is_active: true,
    }
}

fn otts_spec(modification: &str, is_active: bool) -> OttsSpec {
    OttsSpec {
        number: format!("KZ {}", modification),
        date: NaiveDate::from_ymd_opt(2024, 1, 2),
        modification: modification.to_string(),
        name: "МЗСА".to_string(),
        axle_count: 1,
        full_mass_kg: Some(750),
        is_active,
    }
}

async fn create_customer(app: &TestApp, spec: CustomerSpec) -> AppResult<CustomerId> {
    app.state
        .customers
        .create_customer(CreateCustomerCommand {
            caller: CallerIdentity::admin(None),
            spec,
        })
        .await
}

#[tokio::test]
async fn test_customer_dedup_by_tax_id() {
    let app = TestApp::new();
    create_customer(&app, person("Иванов Иван", Some("900101300123"), None))
        .await
        .unwrap();

    let err = create_customer(&app, person("Другой Человек", Some("900101300123"), None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_customer_dedup_by_name_and_phone() {
    let app = TestApp::new();
    create_customer(&app, person("Иванов Иван", None, Some("+7 701")))
        .await
        .unwrap();

    let err = create_customer(&app, person("  иванов иван ", None, Some("+7 701")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    create_customer(&app, person("Иванов Иван", None, Some("+7 702")))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_customer_edit_keeps_own_identity() {
    let app = TestApp::new();
    let id = create_customer(&app, person("Иванов Иван", Some("900101300123"), None))
        .await
        .unwrap();

    app.state
        .customers
        .update_customer(UpdateCustomerCommand {
            customer_id: id,
            caller: CallerIdentity::admin(None),
            spec: person("Иванов Иван Иванович", Some("900101300123"), Some("+7 701")),
        })
        .await
        .unwrap();

    let customer = app.state.customers.get_customer(id).await.unwrap();
    assert_eq!(customer.name(), "Иванов Иван Иванович");
}

#[tokio::test]
async fn test_customer_search_and_delete_guard() {
    let app = TestApp::new();
    let wh = app.seed_catalog().await;
    let trailer = app.trailer("VIN1", wh).await;
    let id = create_customer(&app, person("Иванов Иван", Some("900101300123"), Some("+7 701 111")))
        .await
        .unwrap();
    create_customer(
        &app,
        CustomerSpec {
            kind: CustomerKind::Company {
                contact_person: Some("Петров".to_string()),
            },
            name: "ТОО Прицеп".to_string(),
            iin_bin: None,
            phone: None,
            email: Some("info@pricep.kz".to_string()),
            address: None,
            is_active: true,
        },
    )
    .await
    .unwrap();

    let found = app.state.customers.search_customers(Some("петров")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), "ТОО Прицеп");
    assert_eq!(app.state.customers.search_customers(Some("  ")).await.unwrap().len(), 2);

    app.contract(
        trailer,
        None,
        ContractTerms {
            customer_id: Some(id),
            ..Default::default()
        },
    )
    .await;

    let err = app
        .state
        .customers
        .delete_customer(DeleteCustomerCommand {
            customer_id: id,
            caller: CallerIdentity::admin(None),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let app = TestApp::new();
    let mut spec = person("Иванов Иван", None, None);
    spec.email = Some("not-an-email".to_string());
    let err = create_customer(&app, spec).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_email_without_local_part_or_domain_is_rejected() {
    let app = TestApp::new();
    for email in ["@", "a@", "@b", "a b@c d"] {
        let mut spec = person("Иванов Иван", None, None);
        spec.email = Some(email.to_string());
        let err = create_customer(&app, spec).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "принят {email:?}");
    }

    let mut spec = person("Иванов Иван", None, None);
    spec.email = Some("info@pricep.kz".to_string());
    create_customer(&app, spec).await.unwrap();
}

#[tokio::test]
async fn test_warehouse_admin_only_and_unique() {
    let app = TestApp::new();
    let manager = CallerIdentity::manager(None, None);

    let err = app
        .state
        .warehouses
        .create_warehouse(CreateWarehouseCommand {
            caller: manager.clone(),
            name: "Алматы".to_string(),
            is_active: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let id = app.warehouse("Алматы").await;
    let err = app
        .state
        .warehouses
        .create_warehouse(CreateWarehouseCommand {
            caller: CallerIdentity::admin(None),
            name: "Алматы".to_string(),
            is_active: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    app.state
        .warehouses
        .set_active(SetWarehouseActiveCommand {
            warehouse_id: id,
            caller: CallerIdentity::admin(None),
            is_active: false,
        })
        .await
        .unwrap();
    assert!(!app.state.warehouses.get_warehouse(id).await.unwrap().is_active());

    let err = app
        .state
        .warehouses
        .set_active(SetWarehouseActiveCommand {
            warehouse_id: id,
            caller: manager,
            is_active: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_trailer_links_otts_by_vin() {
    let app = TestApp::new();
    let wh = app.seed_catalog().await;
    app.state
        .otts
        .create_otts(CreateOttsCommand {
            caller: CallerIdentity::admin(None),
            spec: otts_spec("002", false),
        })
        .await
        .unwrap();
    let active = app
        .state
        .otts
        .create_otts(CreateOttsCommand {
            caller: CallerIdentity::admin(None),
            spec: otts_spec("002", true),
        })
        .await
        .unwrap();

    let trailer_id = app
        .state
        .trailers
        .create_trailer(CreateTrailerCommand {
            caller: CallerIdentity::admin(None),
            vin: "y3ka00002r0000123".to_string(),
            model: standard_selection(),
            warehouse_id: wh,
            manufacture_date: None,
            status: TrailerStatus::InStock,
            comment: Some("  ".to_string()),
        })
        .await
        .unwrap();

    let trailer = app.state.trailers.get_trailer(trailer_id).await.unwrap();
    assert_eq!(trailer.vin().as_str(), "Y3KA00002R0000123");
    assert_eq!(trailer.otts_id(), Some(active));
    assert_eq!(trailer.comment(), None);

    let found = app.state.otts.find_for_vin("Y3KA00002R0000123").await.unwrap();
    assert_eq!(found.map(|o| o.id()), Some(active));

    let err = app
        .state
        .otts
        .delete_otts(DeleteOttsCommand {
            otts_id: active,
            caller: CallerIdentity::manager(None, Some(wh)),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    app.state
        .otts
        .delete_otts(DeleteOttsCommand {
            otts_id: active,
            caller: CallerIdentity::admin(None),
        })
        .await
        .unwrap();
    let trailer = app.state.trailers.get_trailer(trailer_id).await.unwrap();
    assert_eq!(trailer.otts_id(), None);
}

#[tokio::test]
async fn test_duplicate_vin_is_rejected() {
    let app = TestApp::new();
    let wh = app.seed_catalog().await;
    app.trailer("VIN1", wh).await;

    let err = app
        .state
        .trailers
        .create_trailer(CreateTrailerCommand {
            caller: CallerIdentity::admin(None),
            vin: " vin1 ".to_string(),
            model: standard_selection(),
            warehouse_id: wh,
            manufacture_date: None,
            status: TrailerStatus::InStock,
            comment: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
