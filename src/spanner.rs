use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_googleapis::spanner::v1::Mutation;
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig, Error as ClientError};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert, update};
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use std::sync::Arc;

use crate::accessor::MenuItemAccessor;
use crate::config::SpannerSettings;
use crate::menu_item::{Category, MenuItem};

const TABLE: &str = "menu_items";
const COLUMNS: [&str; 6] = [
    "id",
    "category",
    "description",
    "price",
    "vegetarian",
    "updated_at",
];

/// Menu item accessor backed by Cloud Spanner
///
/// Cheap to clone; all clones share one session pool.
#[derive(Clone)]
pub struct SpannerAccessor {
    inner: Arc<Client>,
}

impl SpannerAccessor {
    /// Connect to Spanner, creating the database and `menu_items` table
    /// first if they are missing (and the instance, on the emulator).
    ///
    /// The gcloud-spanner library picks up SPANNER_EMULATOR_HOST from the
    /// environment and targets the emulator when it is set.
    pub async fn from_settings(settings: &SpannerSettings) -> Result<Self> {
        auto_provision(settings).await?;

        let database_path = format!(
            "projects/{}/instances/{}/databases/{}",
            settings.project, settings.instance, settings.database
        );

        match &settings.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Run a query and convert every returned row into a menu item
    async fn query_items(&self, statement: Statement) -> Result<Vec<MenuItem>> {
        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query menu items from Spanner")?;

        let mut items = Vec::new();
        while let Some(row) = result_set.next().await? {
            items.push(row_to_item(&row)?);
        }
        Ok(items)
    }

    /// Commit `mutations` in one transaction
    ///
    /// A commit rejected with `refusal` yields `Ok(false)`; row presence is
    /// decided by the commit itself rather than by an earlier read.
    async fn apply(&self, mutations: Vec<Mutation>, action: &str, refusal: Code) -> Result<bool> {
        match self.inner.apply(mutations).await {
            Ok(_) => Ok(true),
            Err(e) if is_refusal(&e, refusal) => {
                tracing::debug!("Spanner refused to {} menu item: {}", action, e);
                Ok(false)
            }
            Err(e) => {
                Err(e).with_context(|| format!("Failed to {} menu item in Spanner", action))
            }
        }
    }
}

impl std::fmt::Debug for SpannerAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpannerAccessor").finish_non_exhaustive()
    }
}

fn is_refusal(error: &ClientError, refusal: Code) -> bool {
    matches!(error, ClientError::GRPC(status) if status.code() == refusal)
}

fn row_to_item(row: &Row) -> Result<MenuItem> {
    let id: i64 = row.column_by_name("id")?;
    let category: String = row.column_by_name("category")?;
    let description: String = row.column_by_name("description")?;
    let price: f64 = row.column_by_name("price")?;
    let vegetarian: bool = row.column_by_name("vegetarian")?;

    let id = u32::try_from(id).with_context(|| format!("Stored menu item id out of range: {}", id))?;
    let category = category
        .parse::<Category>()
        .with_context(|| format!("Stored menu item {} has an invalid category", id))?;

    MenuItem::new(id, category, description, price, vegetarian)
        .with_context(|| format!("Stored menu item {} failed validation", id))
}

#[async_trait]
impl MenuItemAccessor for SpannerAccessor {
    async fn get_all_items(&self) -> Result<Vec<MenuItem>> {
        let statement = Statement::new(
            "SELECT id, category, description, price, vegetarian FROM menu_items ORDER BY id ASC",
        );
        let items = self.query_items(statement).await?;
        tracing::debug!("Listed {} menu items", items.len());
        Ok(items)
    }

    async fn get_item_by_id(&self, id: u32) -> Result<Option<MenuItem>> {
        let mut statement = Statement::new(
            "SELECT id, category, description, price, vegetarian FROM menu_items WHERE id = @id",
        );
        statement.add_param("id", &i64::from(id));

        let item = self.query_items(statement).await?.into_iter().next();
        if item.is_none() {
            tracing::debug!("Menu item not found with id: {}", id);
        }
        Ok(item)
    }

    async fn add_item(&self, item: &MenuItem) -> Result<bool> {
        let mutation = insert(
            TABLE,
            &COLUMNS,
            &[
                &i64::from(item.id()),
                &item.category().as_str().to_string(),
                &item.description().to_string(),
                &item.price(),
                &item.vegetarian(),
                &CommitTimestamp::new(),
            ],
        );
        let inserted = self
            .apply(vec![mutation], "insert", Code::AlreadyExists)
            .await?;

        if inserted {
            tracing::debug!("Inserted menu item with id: {}", item.id());
        }
        Ok(inserted)
    }

    async fn update_item(&self, item: &MenuItem) -> Result<bool> {
        let mutation = update(
            TABLE,
            &COLUMNS,
            &[
                &i64::from(item.id()),
                &item.category().as_str().to_string(),
                &item.description().to_string(),
                &item.price(),
                &item.vegetarian(),
                &CommitTimestamp::new(),
            ],
        );
        let updated = self.apply(vec![mutation], "update", Code::NotFound).await?;

        if updated {
            tracing::debug!("Updated menu item with id: {}", item.id());
        }
        Ok(updated)
    }

    async fn delete_item(&self, item: &MenuItem) -> Result<bool> {
        let id = i64::from(item.id());

        // A bare delete of a missing row commits fine, so the commit also
        // touches the row to make absence fail with NOT_FOUND.
        let mutations = vec![
            update(TABLE, &["id", "updated_at"], &[&id, &CommitTimestamp::new()]),
            delete(TABLE, Key::new(&id)),
        ];
        let deleted = self.apply(mutations, "delete", Code::NotFound).await?;

        if deleted {
            tracing::debug!("Deleted menu item with id: {}", item.id());
        }
        Ok(deleted)
    }

    /// Run a lightweight `SELECT 1` against the database
    async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

const MENU_ITEMS_DDL: &str = "CREATE TABLE menu_items (
    id INT64 NOT NULL,
    category STRING(3) NOT NULL,
    description STRING(MAX) NOT NULL,
    price FLOAT64 NOT NULL,
    vegetarian BOOL NOT NULL,
    updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (id)";

/// Bring the configured database up to the menu schema
///
/// Against the emulator the instance is created too, so a fresh emulator
/// needs no setup. Production instances are expected to exist already.
async fn auto_provision(settings: &SpannerSettings) -> Result<()> {
    let admin = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project = format!("projects/{}", settings.project);
    let instance = format!("{}/instances/{}", project, settings.instance);
    let database = format!("{}/databases/{}", instance, settings.database);

    if settings.emulator_host.is_some() {
        let lookup = admin
            .instance()
            .get_instance(
                GetInstanceRequest {
                    name: instance.clone(),
                    field_mask: None,
                },
                None,
            )
            .await
            .map(drop);

        get_or_create("instance", &instance, lookup, async {
            let request = CreateInstanceRequest {
                parent: project.clone(),
                instance_id: settings.instance.clone(),
                instance: Some(Instance {
                    name: instance.clone(),
                    config: format!("{}/instanceConfigs/emulator-config", project),
                    display_name: settings.instance.clone(),
                    node_count: 1,
                    ..Default::default()
                }),
            };
            admin
                .instance()
                .create_instance(request, None)
                .await
                .context("Failed to start instance creation")?
                .wait(None)
                .await
                .context("Failed to create instance")?;
            anyhow::Ok(())
        })
        .await?;
    }

    let lookup = admin
        .database()
        .get_database(
            GetDatabaseRequest {
                name: database.clone(),
            },
            None,
        )
        .await
        .map(drop);

    // A new database gets the table in the same operation
    let created = get_or_create("database", &database, lookup, async {
        let request = CreateDatabaseRequest {
            parent: instance.clone(),
            create_statement: format!("CREATE DATABASE `{}`", settings.database),
            extra_statements: vec![MENU_ITEMS_DDL.to_string()],
            encryption_config: None,
            database_dialect: 1,
            proto_descriptors: vec![],
        };
        admin
            .database()
            .create_database(request, None)
            .await
            .context("Failed to start database creation")?
            .wait(None)
            .await
            .context("Failed to create database")?;
        anyhow::Ok(())
    })
    .await?;

    if !created {
        ensure_menu_table(&admin, &database).await?;
    }
    Ok(())
}

/// Run `create` only when `lookup` failed with NOT_FOUND
///
/// Returns whether the resource was created. Any other lookup failure is
/// reported as an error.
async fn get_or_create(
    kind: &str,
    name: &str,
    lookup: std::result::Result<(), Status>,
    create: impl Future<Output = Result<()>>,
) -> Result<bool> {
    match lookup {
        Ok(()) => {
            tracing::info!("Spanner {} ready: {}", kind, name);
            Ok(false)
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Creating Spanner {}: {}", kind, name);
            create.await?;
            tracing::info!("Created Spanner {}: {}", kind, name);
            Ok(true)
        }
        Err(status) => Err(anyhow::anyhow!(
            "Failed to look up Spanner {} {}: {}",
            kind,
            name,
            status.message()
        )),
    }
}

async fn ensure_menu_table(admin: &AdminClient, database: &str) -> Result<()> {
    let statements = admin
        .database()
        .get_database_ddl(
            GetDatabaseDdlRequest {
                database: database.to_string(),
            },
            None,
        )
        .await
        .context("Failed to get database DDL")?
        .into_inner()
        .statements;

    if statements.iter().any(|ddl| declares_menu_table(ddl)) {
        return Ok(());
    }

    tracing::info!("Creating table {} in {}", TABLE, database);
    let request = UpdateDatabaseDdlRequest {
        database: database.to_string(),
        statements: vec![MENU_ITEMS_DDL.to_string()],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };
    admin
        .database()
        .update_database_ddl(request, None)
        .await
        .context("Failed to start table creation")?
        .wait(None)
        .await
        .context("Failed to create table")?;
    Ok(())
}

fn declares_menu_table(ddl: &str) -> bool {
    let ddl = ddl.trim_start();
    ddl.starts_with("CREATE TABLE menu_items ") || ddl.starts_with("CREATE TABLE `menu_items` ")
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests need the Spanner emulator on localhost:9010 and return
    // early when it is not running.

    fn emulator_settings(instance: &str) -> SpannerSettings {
        SpannerSettings {
            emulator_host: Some("localhost:9010".to_string()),
            project: "test-project".to_string(),
            instance: instance.to_string(),
            database: format!("{}-db", instance),
        }
    }

    async fn connect(instance: &str) -> Option<SpannerAccessor> {
        unsafe {
            std::env::set_var("SPANNER_EMULATOR_HOST", "localhost:9010");
        }

        match SpannerAccessor::from_settings(&emulator_settings(instance)).await {
            Ok(accessor) => Some(accessor),
            Err(e) => {
                println!("Spanner emulator unavailable, skipping: {}", e);
                None
            }
        }
    }

    #[test]
    fn test_accessor_is_clonable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<SpannerAccessor>();
    }

    #[test]
    fn test_accessor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpannerAccessor>();
    }

    #[test]
    fn test_refusal_matches_only_the_expected_code() {
        let exists = ClientError::GRPC(Status::new(Code::AlreadyExists, "row exists"));
        let missing = ClientError::GRPC(Status::new(Code::NotFound, "row not found"));
        let outage = ClientError::GRPC(Status::new(Code::Unavailable, "connection reset"));

        assert!(is_refusal(&exists, Code::AlreadyExists));
        assert!(!is_refusal(&exists, Code::NotFound));
        assert!(is_refusal(&missing, Code::NotFound));
        assert!(!is_refusal(&outage, Code::NotFound));
        assert!(!is_refusal(&outage, Code::AlreadyExists));
    }

    #[test]
    fn test_menu_table_detection() {
        assert!(declares_menu_table(MENU_ITEMS_DDL));
        assert!(declares_menu_table("CREATE TABLE `menu_items` (\n  id INT64,\n) PRIMARY KEY(id)"));
        assert!(!declares_menu_table("CREATE TABLE menu_items_archive (id INT64) PRIMARY KEY (id)"));
        assert!(!declares_menu_table("CREATE INDEX menu_items_by_category ON menu_items(category)"));
    }

    #[tokio::test]
    async fn test_get_or_create_only_creates_missing() {
        let created = get_or_create("database", "db", Ok(()), async {
            Err::<(), _>(anyhow::anyhow!("existing resource must not be recreated"))
        })
        .await
        .unwrap();
        assert!(!created);

        let missing = Err(Status::new(Code::NotFound, "no such database"));
        let created = get_or_create("database", "db", missing, async { anyhow::Ok(()) })
            .await
            .unwrap();
        assert!(created);

        let denied = Err(Status::new(Code::PermissionDenied, "denied"));
        let err = get_or_create("database", "db", denied, async { anyhow::Ok(()) })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to look up Spanner database db"));
    }

    #[tokio::test]
    async fn test_connection_errors_have_context() {
        unsafe {
            std::env::set_var("SPANNER_EMULATOR_HOST", "localhost:9010");
        }

        let result = SpannerAccessor::from_settings(&emulator_settings("context-test")).await;

        if let Err(e) = result {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains("Failed to create Spanner")
                    || error_msg.contains("Failed to start")
                    || error_msg.contains("Failed to look up")
                    || error_msg.contains("Failed to get")
                    || error_msg.contains("Failed to create"),
                "Error should have context: {}",
                error_msg
            );
        }
    }

    #[tokio::test]
    async fn test_auto_provisioning_idempotent() {
        if connect("idempotent-menu").await.is_none() {
            return;
        }
        assert!(
            SpannerAccessor::from_settings(&emulator_settings("idempotent-menu"))
                .await
                .is_ok(),
            "Second auto-provisioning call should succeed"
        );
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let Some(accessor) = connect("crud-menu").await else {
            return;
        };

        let id = 900 + (std::process::id() % 99);
        let soup = MenuItem::new(id, Category::Appetizer, "Soup", 4.5, true).unwrap();
        let _ = accessor.delete_item(&soup).await;

        assert!(accessor.add_item(&soup).await.unwrap());
        assert!(!accessor.add_item(&soup).await.unwrap(), "duplicate add should be refused");
        assert_eq!(accessor.get_item_by_id(id).await.unwrap(), Some(soup.clone()));

        let stew = MenuItem::new(id, Category::Entree, "Stew", 11.25, false).unwrap();
        assert!(accessor.update_item(&stew).await.unwrap());
        assert_eq!(accessor.get_item_by_id(id).await.unwrap(), Some(stew.clone()));

        let listed = accessor.get_all_items().await.unwrap();
        assert!(listed.contains(&stew));
        assert!(listed.windows(2).all(|w| w[0].id() < w[1].id()));

        assert!(accessor.delete_item(&stew).await.unwrap());
        assert!(!accessor.delete_item(&stew).await.unwrap(), "second delete should be refused");
        assert!(accessor.get_item_by_id(id).await.unwrap().is_none());
        assert!(!accessor.update_item(&stew).await.unwrap());
    }

    #[tokio::test]
    async fn test_health_check() {
        let Some(accessor) = connect("health-menu").await else {
            return;
        };
        assert!(accessor.health_check().await.is_ok());
    }
}
