use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    AllocationInput, ChartLayout, DonutGeometry, NormalizedAllocation, RateBasis, SeriesPoint,
    SimulationConfig, Summary, TermBasis, build_arcs, fallback_container_width, layout,
    monthly_periodic_rate, normalize_allocation, parse_amount, project, resolved_months,
    scroll_hint_opacity, scroll_hint_visible, slice_path, summarize,
};

const MAX_TERM_MONTHS: u32 = 1_200;
const DEFAULT_SCREEN_WIDTH: f64 = 375.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRateBasis {
    Monthly,
    Annual,
}

impl From<CliRateBasis> for RateBasis {
    fn from(value: CliRateBasis) -> Self {
        match value {
            CliRateBasis::Monthly => RateBasis::Monthly,
            CliRateBasis::Annual => RateBasis::Annual,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliTermBasis {
    Months,
    Years,
}

impl From<CliTermBasis> for TermBasis {
    fn from(value: CliTermBasis) -> Self {
        match value {
            CliTermBasis::Months => TermBasis::Months,
            CliTermBasis::Years => TermBasis::Years,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiRateBasis {
    #[serde(alias = "mensal")]
    Monthly,
    #[serde(alias = "anual")]
    Annual,
}

impl From<ApiRateBasis> for CliRateBasis {
    fn from(value: ApiRateBasis) -> Self {
        match value {
            ApiRateBasis::Monthly => CliRateBasis::Monthly,
            ApiRateBasis::Annual => CliRateBasis::Annual,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiTermBasis {
    #[serde(alias = "meses", alias = "mes(es)")]
    Months,
    #[serde(alias = "anos")]
    Years,
}

impl From<ApiTermBasis> for CliTermBasis {
    fn from(value: ApiTermBasis) -> Self {
        match value {
            ApiTermBasis::Months => CliTermBasis::Months,
            ApiTermBasis::Years => CliTermBasis::Years,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    initial_contribution: Option<String>,
    monthly_contribution: Option<String>,
    rate: Option<String>,
    rate_basis: Option<ApiRateBasis>,
    term: Option<String>,
    term_basis: Option<ApiTermBasis>,
    container_width: Option<f64>,
    screen_width: Option<f64>,
    scroll_offset: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AllocationPayload {
    equities: Option<f64>,
    fixed_income: Option<f64>,
    real_estate: Option<f64>,
    liquidity: Option<f64>,
    size: Option<f64>,
    outer_radius: Option<f64>,
    inner_radius: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "projeta",
    about = "Compound-interest projection engine with chart-ready geometry"
)]
struct Cli {
    #[arg(
        long,
        default_value = "",
        help = "Initial contribution as free-form text, e.g. \"10.000,50\""
    )]
    initial_contribution: String,
    #[arg(
        long,
        default_value = "",
        help = "Recurring monthly contribution as free-form text"
    )]
    monthly_contribution: String,
    #[arg(
        long,
        default_value = "",
        help = "Interest rate in percent as free-form text, e.g. \"1\" or \"12,5\""
    )]
    rate: String,
    #[arg(
        long,
        value_enum,
        default_value_t = CliRateBasis::Monthly,
        help = "Whether the rate is per month or per year"
    )]
    rate_basis: CliRateBasis,
    #[arg(long, default_value = "", help = "Term length as free-form text")]
    term: String,
    #[arg(
        long,
        value_enum,
        default_value_t = CliTermBasis::Months,
        help = "Whether the term counts months or years"
    )]
    term_basis: CliTermBasis,
    #[arg(
        long,
        help = "Measured chart container width in device-independent units"
    )]
    container_width: Option<f64>,
    #[arg(
        long,
        help = "Screen width used to approximate the container before it is measured"
    )]
    screen_width: Option<f64>,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Horizontal scroll offset driving the scroll-hint fade"
    )]
    scroll_offset: f64,
}

#[derive(Debug)]
struct ApiRequest {
    config: SimulationConfig,
    container_width: f64,
    scroll_offset: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrollHintResponse {
    opacity: f64,
    visible: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    resolved_months: u32,
    monthly_rate: f64,
    series: Vec<SeriesPoint>,
    summary: Summary,
    chart: Option<ChartLayout>,
    scroll_hint: Option<ScrollHintResponse>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
enum Category {
    Equities,
    FixedIncome,
    RealEstate,
    Liquidity,
}

const CATEGORIES: [Category; 4] = [
    Category::Equities,
    Category::FixedIncome,
    Category::RealEstate,
    Category::Liquidity,
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationPartResponse {
    category: Category,
    value: f64,
    share_percent: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationSliceResponse {
    category: Category,
    start_deg: f64,
    end_deg: f64,
    sweep_deg: f64,
    color_index: usize,
    path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationResponse {
    has_data: bool,
    allocation: NormalizedAllocation,
    parts: Vec<AllocationPartResponse>,
    slices: Vec<AllocationSliceResponse>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_config(cli: Cli) -> Result<ApiRequest, String> {
    if let Some(width) = cli.container_width {
        if !width.is_finite() {
            return Err("--container-width must be finite".to_string());
        }
    }

    if let Some(width) = cli.screen_width {
        if !width.is_finite() {
            return Err("--screen-width must be finite".to_string());
        }
    }

    if !cli.scroll_offset.is_finite() {
        return Err("--scroll-offset must be finite".to_string());
    }

    let config = SimulationConfig {
        initial_contribution: parse_amount(&cli.initial_contribution),
        monthly_contribution: parse_amount(&cli.monthly_contribution),
        rate_percent: parse_amount(&cli.rate),
        rate_basis: cli.rate_basis.into(),
        term_value: parse_amount(&cli.term),
        term_basis: cli.term_basis.into(),
    };

    let months = resolved_months(&config);
    if months > MAX_TERM_MONTHS {
        return Err(format!(
            "--term must resolve to at most {MAX_TERM_MONTHS} months, got {months}"
        ));
    }

    // A measured container width wins; otherwise approximate it from the
    // screen width the way the rendering surface does before layout.
    let container_width = match cli.container_width {
        Some(width) if width > 0.0 => width,
        _ => fallback_container_width(cli.screen_width.unwrap_or(DEFAULT_SCREEN_WIDTH)),
    };

    Ok(ApiRequest {
        config,
        container_width,
        scroll_offset: cli.scroll_offset,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route(
            "/api/allocation",
            get(allocation_get_handler).post(allocation_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("projeta HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/simulate");

    axum::serve(listener, app).await
}

pub fn run_simulate_cli(args: &[String]) -> Result<String, String> {
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;
    let request = build_config(cli)?;
    let response = build_simulate_response(&request);
    serde_json::to_string_pretty(&response).map_err(|e| e.to_string())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    json_response(StatusCode::OK, build_simulate_response(&request))
}

async fn allocation_get_handler(Query(payload): Query<AllocationPayload>) -> Response {
    allocation_handler_impl(payload).await
}

async fn allocation_post_handler(Json(payload): Json<AllocationPayload>) -> Response {
    allocation_handler_impl(payload).await
}

async fn allocation_handler_impl(payload: AllocationPayload) -> Response {
    match build_allocation_response(&payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.initial_contribution {
        cli.initial_contribution = v;
    }
    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v;
    }
    if let Some(v) = payload.rate {
        cli.rate = v;
    }
    if let Some(v) = payload.rate_basis {
        cli.rate_basis = v.into();
    }
    if let Some(v) = payload.term {
        cli.term = v;
    }
    if let Some(v) = payload.term_basis {
        cli.term_basis = v.into();
    }
    if let Some(v) = payload.container_width {
        cli.container_width = Some(v);
    }
    if let Some(v) = payload.screen_width {
        cli.screen_width = Some(v);
    }
    if let Some(v) = payload.scroll_offset {
        cli.scroll_offset = v;
    }

    build_config(cli)
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn default_cli_for_api() -> Cli {
    Cli {
        initial_contribution: String::new(),
        monthly_contribution: String::new(),
        rate: String::new(),
        rate_basis: CliRateBasis::Monthly,
        term: String::new(),
        term_basis: CliTermBasis::Months,
        container_width: None,
        screen_width: None,
        scroll_offset: 0.0,
    }
}

fn build_simulate_response(request: &ApiRequest) -> SimulateResponse {
    let series = project(&request.config);
    let summary = summarize(&series);
    let chart = layout(&series, request.container_width);

    // The hint only exists on a scrollable chart.
    let scroll_hint = chart
        .as_ref()
        .filter(|c| c.geometry.is_scrollable)
        .map(|_| {
            let opacity = scroll_hint_opacity(request.scroll_offset);
            ScrollHintResponse {
                opacity,
                visible: scroll_hint_visible(opacity),
            }
        });

    SimulateResponse {
        resolved_months: resolved_months(&request.config),
        monthly_rate: monthly_periodic_rate(&request.config),
        series,
        summary,
        chart,
        scroll_hint,
    }
}

fn build_donut_geometry(payload: &AllocationPayload) -> Result<DonutGeometry, String> {
    let defaults = DonutGeometry::default();
    let geometry = DonutGeometry {
        size: payload.size.unwrap_or(defaults.size),
        outer_radius: payload.outer_radius.unwrap_or(defaults.outer_radius),
        inner_radius: payload.inner_radius.unwrap_or(defaults.inner_radius),
    };

    for (name, value) in [
        ("size", geometry.size),
        ("outerRadius", geometry.outer_radius),
        ("innerRadius", geometry.inner_radius),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(format!("{name} must be a positive finite number"));
        }
    }

    if geometry.inner_radius >= geometry.outer_radius {
        return Err("innerRadius must be smaller than outerRadius".to_string());
    }

    Ok(geometry)
}

fn build_allocation_response(payload: &AllocationPayload) -> Result<AllocationResponse, String> {
    let geometry = build_donut_geometry(payload)?;
    let allocation = normalize_allocation(&AllocationInput {
        equities: payload.equities,
        fixed_income: payload.fixed_income,
        real_estate: payload.real_estate,
        liquidity: payload.liquidity,
    });

    let parts = allocation
        .values()
        .into_iter()
        .zip(CATEGORIES)
        .map(|(value, category)| AllocationPartResponse {
            category,
            value,
            share_percent: allocation.share_percent(value),
        })
        .collect();

    let slices = build_arcs(&allocation)
        .iter()
        .map(|slice| AllocationSliceResponse {
            category: CATEGORIES[slice.color_index],
            start_deg: slice.start_deg,
            end_deg: slice.end_deg,
            sweep_deg: slice.sweep_deg(),
            color_index: slice.color_index,
            path: slice_path(&geometry, slice),
        })
        .collect();

    Ok(AllocationResponse {
        has_data: allocation.has_data(),
        allocation,
        parts,
        slices,
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
