use std::sync::Arc;

use skiff::config::Config;
use skiff::dispatch::{HandlerOutcome, ParamValue, RequestContext, ResponseParts};
use skiff::{logger, server, App};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = server::create_listener(addr)?;

    let app = demo_app();
    logger::log_route_table(&app.snapshot());
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(server::ServerState::new(cfg, app.into_dispatcher()));
    server::serve(listener, state).await
}

/// Sample routes exercising each dispatch path: a structured response, a
/// bare text body, params access, and raw body echo.
fn demo_app() -> App {
    let mut app = App::new();

    app.get("/hello", |_ctx| {
        HandlerOutcome::Response(ResponseParts::with_body(200, "Hello world"))
    });

    // A bare text return is normalized to 200 OK
    app.get("/string", |_ctx| HandlerOutcome::Text(STRING_PAGE.to_string()));

    app.get("/", |ctx| {
        HandlerOutcome::Text(format!("Your params are {}", params_json(ctx)))
    });

    app.post("/", |ctx| {
        HandlerOutcome::Response(ResponseParts {
            status: 200,
            headers: Vec::new(),
            body: vec![ctx.body().clone()],
        })
    });

    app
}

/// Render the merged params map as a JSON object.
fn params_json(ctx: &RequestContext) -> String {
    let map: serde_json::Map<String, serde_json::Value> = ctx
        .params()
        .iter()
        .map(|(key, value)| {
            let json = match value {
                ParamValue::Single(v) => serde_json::Value::String(v.clone()),
                ParamValue::Many(vs) => serde_json::Value::Array(
                    vs.iter().cloned().map(serde_json::Value::String).collect(),
                ),
            };
            (key.clone(), json)
        })
        .collect();
    serde_json::Value::Object(map).to_string()
}

const STRING_PAGE: &str = r"<html>
  <head>
    <style>
      body { background: #CDE; }
      h1 { color: #0000FF; font-family: sans-serif; }
    </style>
  </head>
  <body>
    <h1>This is a string returned directly from the handler</h1>
    <p>A bare text return is served as a 200 OK with this body.</p>
  </body>
</html>
";
