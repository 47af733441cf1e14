//! 型号匹配与物料目录测试

mod common;

use common::{standard_selection, trailer_spec, TestApp};
use dealer_errors::AppError;
use sd_trailer::application::commands::{CreateItemCommand, CreateTrailerCommand, DeleteItemCommand};
use sd_trailer::application::handlers::NO_MATCH_MESSAGE;
use sd_trailer::application::queries::ModelSelection;
use sd_trailer::domain::entities::ItemSpec;
use sd_trailer::domain::enums::{ItemType, TrailerStatus};
use sd_trailer::domain::value_objects::{CallerIdentity, FeatureQuery};

#[tokio::test]
async fn test_tent_zero_selects_model_without_tent() {
    let app = TestApp::new();
    let with_tent = app.item(trailer_spec("T-1200", Some(1200))).await;
    let no_tent = app.item(trailer_spec("T-0", None)).await;

    let selection = ModelSelection {
        tent_height_mm: Some(0),
        ..standard_selection()
    };
    let item = app.state.catalog.resolve_model(&selection).await.unwrap();
    assert_eq!(item.id(), no_tent);

    let selection = ModelSelection {
        tent_height_mm: Some(1200),
        ..standard_selection()
    };
    let item = app.state.catalog.resolve_model(&selection).await.unwrap();
    assert_eq!(item.id(), with_tent);
}

#[tokio::test]
async fn test_unspecified_tent_does_not_filter() {
    let app = TestApp::new();
    let first = app.item(trailer_spec("T-1200", Some(1200))).await;
    app.item(trailer_spec("T-0", None)).await;

    let item = app.state.catalog.resolve_model(&standard_selection()).await.unwrap();
    assert_eq!(item.id(), first);
}

#[tokio::test]
async fn test_duplicate_models_resolve_to_first_created() {
    let app = TestApp::new();
    let first = app.item(trailer_spec("DUP-A", None)).await;
    let second = app.item(trailer_spec("DUP-B", None)).await;
    assert_ne!(first, second);

    for _ in 0..3 {
        let item = app.state.catalog.resolve_model(&standard_selection()).await.unwrap();
        assert_eq!(item.id(), first);
    }
}

#[tokio::test]
async fn test_jockey_wheel_must_match_exactly() {
    let app = TestApp::new();
    app.item(trailer_spec("MZSA-817", None)).await;

    let selection = ModelSelection {
        jockey_wheel: false,
        ..standard_selection()
    };
    let err = app.state.catalog.resolve_model(&selection).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(msg) if msg == NO_MATCH_MESSAGE));
}

#[tokio::test]
async fn test_inactive_and_component_items_are_ignored() {
    let app = TestApp::new();
    app.item(ItemSpec {
        is_active: false,
        ..trailer_spec("OLD-1", None)
    })
    .await;
    app.item(ItemSpec {
        item_type: Some(ItemType::Component),
        ..trailer_spec("COMP-1", None)
    })
    .await;

    let criteria = standard_selection().to_criteria().unwrap();
    assert!(app.state.catalog.match_model(&criteria).await.unwrap().is_none());
}

#[tokio::test]
async fn test_non_numeric_board_height_is_rejected() {
    let app = TestApp::new();
    app.item(trailer_spec("MZSA-817", None)).await;

    let selection = ModelSelection {
        board_height_mm: Some("высокий".to_string()),
        ..standard_selection()
    };
    let err = app.state.catalog.resolve_model(&selection).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_trailer_creation_without_match_is_rejected() {
    let app = TestApp::new();
    let warehouse_id = app.seed_catalog().await;

    let err = app
        .state
        .trailers
        .create_trailer(CreateTrailerCommand {
            caller: CallerIdentity::admin(None),
            vin: "Y3KA00002R0000001".to_string(),
            model: ModelSelection {
                axle_count: Some(2),
                ..standard_selection()
            },
            warehouse_id,
            manufacture_date: None,
            status: TrailerStatus::InStock,
            comment: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(msg) if msg == NO_MATCH_MESSAGE));
}

#[tokio::test]
async fn test_feature_lookup_is_plain_equality() {
    let app = TestApp::new();
    let tent = app.item(trailer_spec("T-1200", Some(1200))).await;

    let found = app
        .state
        .catalog
        .find_by_features(&FeatureQuery {
            has_tent: Some(true),
            tent_height_mm: Some(1200),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.map(|i| i.id()), Some(tent));

    let missing = app
        .state
        .catalog
        .find_by_features(&FeatureQuery {
            axle_count: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_form_options_exclude_zero_tent() {
    let app = TestApp::new();
    app.item(trailer_spec("T-1200", Some(1200))).await;
    app.item(trailer_spec("T-0", None)).await;

    let options = app.state.catalog.trailer_form_options().await.unwrap();
    assert_eq!(options.tent_height_mm, vec![1200]);
    assert_eq!(options.axle_count, vec![1]);
    assert_eq!(options.wheel_radius, vec!["R13".to_string()]);
}

#[tokio::test]
async fn test_duplicate_article_is_rejected() {
    let app = TestApp::new();
    app.item(trailer_spec("MZSA-817", None)).await;

    let err = app
        .state
        .catalog
        .create_item(CreateItemCommand {
            caller: CallerIdentity::admin(None),
            spec: trailer_spec("MZSA-817", Some(1200)),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_referenced_item_cannot_be_deleted() {
    let app = TestApp::new();
    let warehouse_id = app.seed_catalog().await;
    app.trailer("Y3KA00002R0000001", warehouse_id).await;
    let item = app.state.catalog.resolve_model(&standard_selection()).await.unwrap();

    let err = app
        .state
        .catalog
        .delete_item(DeleteItemCommand {
            item_id: item.id(),
            caller: CallerIdentity::admin(None),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
