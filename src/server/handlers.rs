use super::{ApiError, store};
use crate::{
    entities::{product, supplier},
    sync::wire::{
        Ack, PostAction, ProductList, PurchaseUpdate, RemoteProduct, RemoteSupplier,
        SupplierList, format_timestamp,
    },
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{info, instrument};

/// `?action=` selector of `GET`.
#[derive(Debug, Deserialize)]
pub struct ActionQuery {
    pub action: Option<String>,
}

/// `?id=` of `DELETE`.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

#[instrument(skip(db))]
pub async fn get_action(
    State(db): State<DatabaseConnection>,
    Query(query): Query<ActionQuery>,
) -> Result<Response, ApiError> {
    match query.action.as_deref().unwrap_or("get_products") {
        "get_products" => {
            let suppliers: HashMap<i64, String> = store::list_suppliers(&db)
                .await?
                .into_iter()
                .map(|s| (s.id, s.name))
                .collect();
            let products = store::list_products(&db)
                .await?
                .into_iter()
                .map(|p| to_remote_product(p, &suppliers))
                .collect();
            Ok(Json(ProductList { products }).into_response())
        }
        "get_suppliers" => {
            let suppliers = store::list_suppliers(&db)
                .await?
                .into_iter()
                .map(to_remote_supplier)
                .collect();
            Ok(Json(SupplierList { suppliers }).into_response())
        }
        _ => Err(ApiError::MethodNotAllowed),
    }
}

/// Parses the body only once its `action` is known, so unknown actions answer 405
/// rather than a decoding error.
#[instrument(skip(db, body))]
pub async fn post_action(
    State(db): State<DatabaseConnection>,
    Json(body): Json<Value>,
) -> Result<Json<Ack>, ApiError> {
    match body.get("action").and_then(Value::as_str) {
        Some("add_product" | "add_supplier") => {}
        _ => return Err(ApiError::MethodNotAllowed),
    }

    let id = match serde_json::from_value::<PostAction>(body)? {
        PostAction::AddProduct(new_product) => {
            let product = store::create_product(&db, new_product).await?;
            info!("Added product {} ({})", product.id, product.name);
            product.id
        }
        PostAction::AddSupplier(new_supplier) => {
            let supplier = store::create_supplier(&db, new_supplier).await?;
            info!("Added supplier {} ({})", supplier.id, supplier.name);
            supplier.id
        }
    };
    Ok(Json(Ack::created(id)))
}

#[instrument(skip(db))]
pub async fn put_purchase(
    State(db): State<DatabaseConnection>,
    Json(update): Json<PurchaseUpdate>,
) -> Result<Json<Ack>, ApiError> {
    store::update_purchase(&db, update).await?;
    Ok(Json(Ack::ok()))
}

#[instrument(skip(db))]
pub async fn delete_product(
    State(db): State<DatabaseConnection>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Ack>, ApiError> {
    store::delete_product(&db, query.id).await?;
    Ok(Json(Ack::ok()))
}

/// Plain `OPTIONS`; preflight requests are answered by the CORS layer.
pub async fn options() -> StatusCode {
    StatusCode::OK
}

/// Any method the endpoint does not serve.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

fn to_remote_product(model: product::Model, suppliers: &HashMap<i64, String>) -> RemoteProduct {
    RemoteProduct {
        id: model.id,
        name: model.name,
        article: model.article,
        image_url: model.image_url,
        hint: model.hint,
        sale_price: model.sale_price,
        purchase_price: model.purchase_price,
        quantity: model.quantity,
        supplier_id: model.supplier_id,
        supplier_name: model
            .supplier_id
            .and_then(|id| suppliers.get(&id).cloned()),
        date_added: Some(format_timestamp(model.date_added)),
        is_completed: model.is_completed,
    }
}

fn to_remote_supplier(model: supplier::Model) -> RemoteSupplier {
    RemoteSupplier {
        id: model.id,
        name: model.name,
        total_debt: model.total_debt,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::super::router;
    use crate::{errors::Result, test_utils::*};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn send(
        db: &sea_orm::DatabaseConnection,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router(db.clone())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_get_products_joins_supplier_name() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = create_test_supplier(&db, "Depot").await?;
        create_test_product(&db, "Bolt", Some(supplier.id)).await?;
        create_test_product(&db, "Nut", Some(supplier.id + 50)).await?;

        let (status, body) = send(&db, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);

        let products = body["products"].as_array().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["name"], "Nut");
        assert!(products[0].get("supplier_name").is_none());
        assert_eq!(products[1]["supplier_name"], "Depot");
        assert_eq!(products[1]["is_completed"], false);
        assert!(products[1]["date_added"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_suppliers() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_supplier(&db, "Zeta").await?;
        create_test_supplier(&db, "Acme").await?;

        let (status, body) = send(&db, "GET", "/?action=get_suppliers", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suppliers"][0]["name"], "Acme");
        assert_eq!(body["suppliers"][1]["total_debt"], 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_post_add_product_and_supplier() -> Result<()> {
        let db = setup_test_db().await?;

        let (status, body) = send(
            &db,
            "POST",
            "/",
            Some(json!({"action": "add_supplier", "name": "Depot"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let supplier_id = body["id"].as_i64().unwrap();

        let (status, body) = send(
            &db,
            "POST",
            "/",
            Some(json!({
                "action": "add_product",
                "name": "Bolt",
                "article": "B-1",
                "hint": "shelf 2",
                "sale_price": 15.0,
                "supplier_id": supplier_id
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["id"].is_i64());

        let (_, listed) = send(&db, "GET", "/?action=get_products", None).await;
        let product = &listed["products"][0];
        assert_eq!(product["quantity"], 1);
        assert_eq!(product["supplier_name"], "Depot");
        assert_eq!(product["hint"], "shelf 2");
        Ok(())
    }

    #[tokio::test]
    async fn test_post_rejects_bad_input() -> Result<()> {
        let db = setup_test_db().await?;

        let (status, body) = send(
            &db,
            "POST",
            "/",
            Some(json!({"action": "add_product", "name": "", "article": "B-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = send(
            &db,
            "POST",
            "/",
            Some(json!({"action": "add_product", "article": "B-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&db, "POST", "/", Some(json!({"action": "drop_tables"}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method not allowed");
        Ok(())
    }

    #[tokio::test]
    async fn test_put_and_delete() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Bolt", None).await?;

        let (status, body) = send(
            &db,
            "PUT",
            "/",
            Some(json!({"id": product.id, "purchase_price": 10.0, "quantity": 3, "is_completed": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (_, listed) = send(&db, "GET", "/", None).await;
        assert_eq!(listed["products"][0]["purchase_price"], 10.0);
        assert_eq!(listed["products"][0]["is_completed"], true);

        let (status, _) = send(&db, "PUT", "/", Some(json!({"id": 999}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let other = create_test_product(&db, "Nut", None).await?;
        let (status, body) = send(&db, "DELETE", &format!("/?id={}", other.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (status, _) = send(&db, "DELETE", "/?id=999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, listed) = send(&db, "GET", "/", None).await;
        let products = listed["products"].as_array().unwrap();
        assert_eq!(products.len(), 2);
        assert!(products.iter().all(|p| p["is_completed"] == true));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_method_and_action() -> Result<()> {
        let db = setup_test_db().await?;

        let (status, body) = send(&db, "GET", "/?action=get_orders", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method not allowed");

        let (status, body) = send(&db, "PATCH", "/", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method not allowed");
        Ok(())
    }

    #[tokio::test]
    async fn test_cors_preflight() -> Result<()> {
        let db = setup_test_db().await?;
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/")
            .header(header::ORIGIN, "http://localhost:8080")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .body(Body::empty())
            .unwrap();

        let response = router(db).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
        assert!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS]
                .to_str()
                .unwrap()
                .contains("DELETE")
        );
        Ok(())
    }
}
