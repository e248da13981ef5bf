use std::time::Duration;

use domain_router::middleware::timeout::Timeout;
use domain_router::request::{Attribute, Req};
use domain_router::{
    Context, DefaultContext, Dispatcher, HandlerError, Method, Next, RouteTable, Scope, from_fn,
};
use log::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder().filter_level(log::LevelFilter::Debug).init();

    let mut table = RouteTable::new();

    // API キーがなければ 401 で止める
    let api_key = from_fn(|c: &mut Context<DefaultContext>| {
        if c.req.attribute("query_key").and_then(Attribute::as_one) == Some("secret") {
            return Ok(Next::Continue);
        }
        c.res.set_status(401).text("Unauthorized");
        Ok(Next::Halt)
    });

    let mut api = Scope::new("api");
    api.use_handlers([api_key.clone()]);
    api.get(&mut table, "/users", [from_fn(|c: &mut Context<DefaultContext>| {
        c.res.json(r#"[{"id":"1"},{"id":"2"}]"#);
        Ok(Next::Continue)
    })])?
    .get(&mut table, "/users/:id", [from_fn(|c: &mut Context<DefaultContext>| {
        let id = c.req.param("id").unwrap_or("unknown").to_string();
        c.res.json_value(&serde_json::json!({ "id": id }));
        Ok(Next::Continue)
    })])?
    .delete(&mut table, "/users/:id", [from_fn(|_c: &mut Context<DefaultContext>| {
        Err(HandlerError::msg("users are read-only").with_status(405))
    })])?;

    let mut site = Scope::new("www");
    site.get(&mut table, "/", [Timeout::new(
        from_fn(|c: &mut Context<DefaultContext>| {
            c.res.html("<h1>hello</h1>");
            Ok(Next::Continue)
        }),
        Duration::from_secs(1),
    )
    .into_boxed()])?;

    let dispatcher = Dispatcher::new(table);

    let requests = [
        ("api", Method::GET, "/users?key=secret"),
        ("api", Method::GET, "/users/42?key=secret"),
        ("api", Method::GET, "/users/42"),
        ("api", Method::DELETE, "/users/42?key=secret"),
        ("api", Method::GET, "/users/?key=secret"),
        ("www", Method::GET, "/"),
        ("www", Method::POST, "/"),
    ];
    for (scope, method, target) in requests {
        let mut ctx = Context::plain(Req::from_target(scope, target));
        let outcome = dispatcher.route(method, &mut ctx).await;
        info!(
            "[{}] {} {} - {:?} {} {}",
            scope, method, target, outcome, ctx.res.code, ctx.res.body
        );
    }
    Ok(())
}
