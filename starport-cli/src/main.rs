#![deny(missing_docs)]
//! Starport command-line client.
//!
//! Drives the ship registry REST API: list, count, get, create, update and
//! delete ships on a running Starport server.

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use starport_core::{ShipOrder, ShipType};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "starport", version, about = "Starport registry CLI")]
struct Cli {
    /// Base URL of the Starport server.
    #[arg(long, env = "STARPORT_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// Substring filter on the ship name.
    #[arg(long)]
    name: Option<String>,
    /// Substring filter on the planet.
    #[arg(long)]
    planet: Option<String>,
    /// Exact hull classification filter (TRANSPORT, MILITARY, MERCHANT).
    #[arg(long)]
    ship_type: Option<ShipType>,
    /// Lower production-date bound, epoch milliseconds.
    #[arg(long)]
    after: Option<i64>,
    /// Upper production-date bound, epoch milliseconds.
    #[arg(long)]
    before: Option<i64>,
    /// Usage flag filter.
    #[arg(long)]
    is_used: Option<bool>,
    /// Lower speed bound.
    #[arg(long)]
    min_speed: Option<f64>,
    /// Upper speed bound.
    #[arg(long)]
    max_speed: Option<f64>,
    /// Lower crew size bound.
    #[arg(long)]
    min_crew_size: Option<i32>,
    /// Upper crew size bound.
    #[arg(long)]
    max_crew_size: Option<i32>,
    /// Lower rating bound.
    #[arg(long)]
    min_rating: Option<f64>,
    /// Upper rating bound.
    #[arg(long)]
    max_rating: Option<f64>,
}

#[derive(Args, Clone, Default)]
struct PageArgs {
    /// Sort column (ID, SPEED, DATE, RATING).
    #[arg(long)]
    order: Option<ShipOrder>,
    /// Zero-based page index.
    #[arg(long)]
    page_number: Option<i64>,
    /// Records per page.
    #[arg(long)]
    page_size: Option<i64>,
}

#[derive(Args, Clone, Default)]
struct ShipFieldArgs {
    /// Ship name.
    #[arg(long)]
    name: Option<String>,
    /// Home planet.
    #[arg(long)]
    planet: Option<String>,
    /// Hull classification (TRANSPORT, MILITARY, MERCHANT).
    #[arg(long)]
    ship_type: Option<ShipType>,
    /// Production date, epoch milliseconds.
    #[arg(long)]
    prod_date: Option<i64>,
    /// Whether the ship has seen prior use.
    #[arg(long)]
    is_used: Option<bool>,
    /// Cruise speed.
    #[arg(long)]
    speed: Option<f64>,
    /// Crew complement.
    #[arg(long)]
    crew_size: Option<i32>,
}

#[derive(Subcommand)]
enum Commands {
    /// List ships matching the filters.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Fetch one ship by id.
    Get {
        /// Ship identifier.
        id: String,
    },
    /// Register a new ship.
    Create {
        #[command(flatten)]
        fields: ShipFieldArgs,
    },
    /// Update fields of an existing ship.
    Update {
        /// Ship identifier.
        id: String,
        #[command(flatten)]
        fields: ShipFieldArgs,
    },
    /// Delete a ship.
    Delete {
        /// Ship identifier.
        id: String,
    },
}

fn push_param(params: &mut Vec<(String, String)>, key: &str, value: Option<impl ToString>) {
    if let Some(value) = value {
        params.push((key.to_string(), value.to_string()));
    }
}

fn filter_params(filter: &FilterArgs) -> Vec<(String, String)> {
    let mut params = Vec::new();
    push_param(&mut params, "name", filter.name.clone());
    push_param(&mut params, "planet", filter.planet.clone());
    push_param(&mut params, "shipType", filter.ship_type);
    push_param(&mut params, "after", filter.after);
    push_param(&mut params, "before", filter.before);
    push_param(&mut params, "isUsed", filter.is_used);
    push_param(&mut params, "minSpeed", filter.min_speed);
    push_param(&mut params, "maxSpeed", filter.max_speed);
    push_param(&mut params, "minCrewSize", filter.min_crew_size);
    push_param(&mut params, "maxCrewSize", filter.max_crew_size);
    push_param(&mut params, "minRating", filter.min_rating);
    push_param(&mut params, "maxRating", filter.max_rating);
    params
}

fn page_params(page: &PageArgs) -> Vec<(String, String)> {
    let mut params = Vec::new();
    push_param(&mut params, "order", page.order);
    push_param(&mut params, "pageNumber", page.page_number);
    push_param(&mut params, "pageSize", page.page_size);
    params
}

fn field_body(fields: &ShipFieldArgs) -> Value {
    let mut body = Map::new();
    if let Some(name) = &fields.name {
        body.insert("name".to_string(), Value::from(name.clone()));
    }
    if let Some(planet) = &fields.planet {
        body.insert("planet".to_string(), Value::from(planet.clone()));
    }
    if let Some(ship_type) = fields.ship_type {
        body.insert("shipType".to_string(), Value::from(ship_type.as_str()));
    }
    if let Some(prod_date) = fields.prod_date {
        body.insert("prodDate".to_string(), Value::from(prod_date));
    }
    if let Some(is_used) = fields.is_used {
        body.insert("isUsed".to_string(), Value::from(is_used));
    }
    if let Some(speed) = fields.speed {
        body.insert("speed".to_string(), Value::from(speed));
    }
    if let Some(crew_size) = fields.crew_size {
        body.insert("crewSize".to_string(), Value::from(crew_size));
    }
    Value::Object(body)
}

struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn list(&self, params: &[(String, String)]) -> CliResult<Value> {
        let response = self
            .http
            .get(self.url("/rest/ships"))
            .query(params)
            .send()
            .await?;
        read_json(response).await
    }

    async fn count(&self, params: &[(String, String)]) -> CliResult<Value> {
        let response = self
            .http
            .get(self.url("/rest/ships/count"))
            .query(params)
            .send()
            .await?;
        read_json(response).await
    }

    async fn get(&self, id: &str) -> CliResult<Value> {
        let response = self
            .http
            .get(self.url(&format!("/rest/ships/{id}")))
            .send()
            .await?;
        read_json(response).await
    }

    async fn create(&self, body: &Value) -> CliResult<Value> {
        let response = self
            .http
            .post(self.url("/rest/ships"))
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    async fn update(&self, id: &str, body: &Value) -> CliResult<Value> {
        let response = self
            .http
            .post(self.url(&format!("/rest/ships/{id}")))
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete(&self, id: &str) -> CliResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/rest/ships/{id}")))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: reqwest::Response) -> CliResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(format!("server returned {status}: {body}").into())
}

async fn read_json(response: reqwest::Response) -> CliResult<Value> {
    let response = ensure_success(response).await?;
    Ok(response.json().await?)
}

fn print_json(value: &Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.server);

    match cli.command {
        Commands::List { filter, page } => {
            let mut params = filter_params(&filter);
            params.extend(page_params(&page));
            print_json(&client.list(&params).await?)?;
        }
        Commands::Count { filter } => {
            print_json(&client.count(&filter_params(&filter)).await?)?;
        }
        Commands::Get { id } => {
            print_json(&client.get(&id).await?)?;
        }
        Commands::Create { fields } => {
            print_json(&client.create(&field_body(&fields)).await?)?;
        }
        Commands::Update { id, fields } => {
            print_json(&client.update(&id, &field_body(&fields)).await?)?;
        }
        Commands::Delete { id } => {
            client.delete(&id).await?;
            println!("deleted ship {id}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ApiClient, FilterArgs, PageArgs, ShipFieldArgs, field_body, filter_params, page_params};
    use httpmock::Method::{DELETE, GET, POST};
    use httpmock::MockServer;
    use starport_core::{ShipOrder, ShipType};

    #[test]
    fn filter_params_use_camel_case_and_skip_absent() {
        let filter = FilterArgs {
            name: Some("Vo".to_string()),
            ship_type: Some(ShipType::Military),
            min_speed: Some(0.5),
            max_crew_size: Some(500),
            ..FilterArgs::default()
        };
        let params = filter_params(&filter);

        assert_eq!(
            params,
            vec![
                ("name".to_string(), "Vo".to_string()),
                ("shipType".to_string(), "MILITARY".to_string()),
                ("minSpeed".to_string(), "0.5".to_string()),
                ("maxCrewSize".to_string(), "500".to_string()),
            ]
        );
    }

    #[test]
    fn page_params_include_order_label() {
        let page = PageArgs {
            order: Some(ShipOrder::Rating),
            page_size: Some(10),
            ..PageArgs::default()
        };
        let params = page_params(&page);

        assert_eq!(
            params,
            vec![
                ("order".to_string(), "RATING".to_string()),
                ("pageSize".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn field_body_includes_only_present_fields() {
        let fields = ShipFieldArgs {
            name: Some("Vostok".to_string()),
            speed: Some(0.5),
            ..ShipFieldArgs::default()
        };

        assert_eq!(
            field_body(&fields),
            serde_json::json!({"name": "Vostok", "speed": 0.5})
        );
    }

    #[tokio::test]
    async fn list_sends_filters_as_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/ships")
                    .query_param("shipType", "TRANSPORT")
                    .query_param("minSpeed", "0.5");
                then.status(200)
                    .header("content-type", "application/json")
                    .body("[]");
            })
            .await;

        let client = ApiClient::new(&server.base_url());
        let filter = FilterArgs {
            ship_type: Some(ShipType::Transport),
            min_speed: Some(0.5),
            ..FilterArgs::default()
        };
        let value = client
            .list(&filter_params(&filter))
            .await
            .expect("list succeeds");

        mock.assert_async().await;
        assert_eq!(value, serde_json::json!([]));
    }

    #[tokio::test]
    async fn create_posts_ship_payload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/ships")
                    .json_body(serde_json::json!({"name": "Vostok", "speed": 0.5}));
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"id":1,"name":"Vostok"}"#);
            })
            .await;

        let client = ApiClient::new(&server.base_url());
        let fields = ShipFieldArgs {
            name: Some("Vostok".to_string()),
            speed: Some(0.5),
            ..ShipFieldArgs::default()
        };
        let value = client
            .create(&field_body(&fields))
            .await
            .expect("create succeeds");

        mock.assert_async().await;
        assert_eq!(value["id"], 1);
    }

    #[tokio::test]
    async fn delete_surfaces_server_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/ships/99");
                then.status(404)
                    .header("content-type", "application/json")
                    .body(r#"{"message":"ship not found"}"#);
            })
            .await;

        let client = ApiClient::new(&server.base_url());
        let error = client.delete("99").await.expect_err("must fail");

        assert!(error.to_string().contains("404"));
        assert!(error.to_string().contains("ship not found"));
    }
}
