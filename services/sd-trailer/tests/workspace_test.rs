//! 经理工作台测试

mod common;

use common::{standard_selection, trailer_spec, TestApp};
use dealer_errors::AppError;
use sd_trailer::application::commands::CreateTrailerCommand;
use sd_trailer::application::queries::{ListTrailersQuery, ModelSelection, WorkspaceQuery};
use sd_trailer::domain::entities::ContractTerms;
use sd_trailer::domain::enums::TrailerStatus;
use sd_trailer::domain::value_objects::{CallerIdentity, TrailerId, WarehouseId};

async fn trailer_with_tent(app: &TestApp, vin: &str, warehouse_id: WarehouseId, tent: i32) -> TrailerId {
    app.state
        .trailers
        .create_trailer(CreateTrailerCommand {
            caller: CallerIdentity::admin(None),
            vin: vin.to_string(),
            model: ModelSelection {
                tent_height_mm: Some(tent),
                ..standard_selection()
            },
            warehouse_id,
            manufacture_date: None,
            status: TrailerStatus::InStock,
            comment: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_manager_workspace() {
    let app = TestApp::new();
    app.item(trailer_spec("B-2", None)).await;
    app.item(trailer_spec("A-1", Some(1200))).await;
    let almaty = app.warehouse("Алматы").await;
    let astana = app.warehouse("Астана").await;

    trailer_with_tent(&app, "VIN3", almaty, 1200).await;
    trailer_with_tent(&app, "VIN1", almaty, 0).await;
    let sold_here = trailer_with_tent(&app, "VIN2", almaty, 0).await;
    let free_there = trailer_with_tent(&app, "VIN9", astana, 0).await;
    let sold_there = trailer_with_tent(&app, "VIN8", astana, 0).await;

    app.contract(sold_here, Some("1"), ContractTerms::default()).await;
    app.contract(
        sold_there,
        Some("2"),
        ContractTerms {
            is_paid: true,
            ..Default::default()
        },
    )
    .await;

    let workspace = app
        .state
        .workspace
        .workspace(WorkspaceQuery {
            caller: CallerIdentity::manager(None, Some(almaty)),
            other_warehouse_id: None,
        })
        .await
        .unwrap();

    assert_eq!(workspace.warehouse_id, almaty);
    let groups: Vec<(&str, Vec<&str>)> = workspace
        .free_trailers
        .iter()
        .map(|g| {
            (
                g.article.as_str(),
                g.trailers.iter().map(|t| t.trailer.vin().as_str()).collect(),
            )
        })
        .collect();
    assert_eq!(groups, vec![("A-1", vec!["VIN3"]), ("B-2", vec!["VIN1"])]);

    assert_eq!(workspace.unpaid_contracts.len(), 1);
    assert_eq!(workspace.unpaid_contracts[0].contract.contract_number(), Some("1"));
    assert_eq!(workspace.paid_not_shipped.len(), 1);
    assert_eq!(workspace.paid_not_shipped[0].contract.contract_number(), Some("2"));

    assert_eq!(workspace.other_warehouse_id, Some(astana));
    let other: Vec<TrailerId> = workspace.other_trailers.iter().map(|t| t.trailer.id()).collect();
    assert_eq!(other, vec![free_there]);
}

#[tokio::test]
async fn test_workspace_requires_manager_with_warehouse() {
    let app = TestApp::new();

    let err = app
        .state
        .workspace
        .workspace(WorkspaceQuery {
            caller: CallerIdentity::admin(None),
            other_warehouse_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = app
        .state
        .workspace
        .workspace(WorkspaceQuery {
            caller: CallerIdentity::manager(None, None),
            other_warehouse_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));
}

#[tokio::test]
async fn test_manager_trailer_list_is_scoped() {
    let app = TestApp::new();
    let almaty = app.seed_catalog().await;
    let astana = app.warehouse("Астана").await;
    app.trailer("VIN1", almaty).await;
    app.trailer("VIN2", astana).await;

    let own = app
        .state
        .trailers
        .list_trailers(ListTrailersQuery {
            caller: CallerIdentity::manager(None, Some(almaty)),
            vin: None,
            article: None,
            status: None,
            warehouse_id: Some(astana),
        })
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].warehouse_name, "Алматы");

    let all = app
        .state
        .trailers
        .list_trailers(ListTrailersQuery {
            caller: CallerIdentity::admin(None),
            vin: Some("vin".to_string()),
            article: Some("mzsa".to_string()),
            status: None,
            warehouse_id: None,
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}
