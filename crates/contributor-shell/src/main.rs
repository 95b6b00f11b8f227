//! Terminal front end for Contributor: renders the spark feed and the
//! conversation overlay as plain text, and drives the controllers from a
//! stdin command loop.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use uuid::Uuid;

use contributor_app::{
    ConversationOverlay, FeedController, FeedView, Notifier, SessionController, SparkActions,
};
use contributor_gateway::{Gateway, GatewayConfig};
use contributor_types::models::{Session, Spark, SparkStatus, UserIdentity};

/// Prints alerts synchronously to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        println!("!! {message}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contributor=debug".into()),
        )
        .init();

    // Config: missing URL or key is fatal before anything starts.
    let config = GatewayConfig::from_env().context("gateway configuration")?;
    let gateway = Gateway::new(config);

    let sessions = SessionController::new(gateway.clone());
    tokio::spawn(sessions.clone().run());

    let feed = Arc::new(FeedController::new(gateway.clone()));
    let overlay = Arc::new(ConversationOverlay::new(gateway.clone()));
    let actions = SparkActions::new(
        gateway.clone(),
        feed.clone(),
        overlay.clone(),
        Arc::new(ConsoleNotifier),
    );

    tokio::spawn(feed.clone().watch_session());

    // Log when the spark list changes out from under the prompt.
    {
        let mut sparks = feed.subscribe();
        tokio::spawn(async move {
            while sparks.changed().await.is_ok() {
                let count = sparks.borrow().len();
                info!(count, "spark list updated");
            }
        });
    }

    feed.reload().await;
    render_feed(&feed);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "feed" => {
                feed.set_view(FeedView::Feed).await;
                render_feed(&feed);
            }
            "mine" => {
                feed.set_view(FeedView::Mine).await;
                render_feed(&feed);
            }
            "new" => {
                if rest.is_empty() {
                    println!("nothing to send — usage: new <body>");
                    continue;
                }
                actions.open_composer();
                actions.create(rest).await;
                if actions.composer_open() {
                    println!("spark not created; composer still open — try again");
                } else {
                    render_feed(&feed);
                }
            }
            "open" => match nth_spark(&feed, rest) {
                Some(spark) => {
                    overlay.open(spark).await;
                    render_conversation(&overlay, &gateway);
                }
                None => println!("usage: open <n> (see the numbers in the feed)"),
            },
            "reply" => {
                if rest.is_empty() {
                    println!("nothing to send — usage: reply <body>");
                    continue;
                }
                let Some(spark) = overlay.selected() else {
                    println!("no conversation open — open <n> first");
                    continue;
                };
                if !overlay.composer_visible(current_user(&gateway)) {
                    println!("this conversation is read-only for you");
                    continue;
                }
                if spark.status == SparkStatus::Open {
                    actions.claim_and_reply(rest).await;
                } else {
                    actions.post_message(rest).await;
                }
                render_conversation(&overlay, &gateway);
            }
            "like" => match nth_spark(&feed, rest) {
                Some(spark) => {
                    actions.toggle_like(spark.id).await;
                    render_feed(&feed);
                }
                None => println!("usage: like <n>"),
            },
            "follow" => match nth_spark(&feed, rest) {
                Some(spark) => {
                    actions.follow(spark.id).await;
                    println!("following \"{}\"", spark.body);
                }
                None => println!("usage: follow <n>"),
            },
            "login" => {
                if rest.is_empty() {
                    println!("usage: login <email>");
                    continue;
                }
                match gateway.request_magic_link(rest).await {
                    Ok(()) => println!("check your email for a magic link, then: token <access-token> <user-id> <email>"),
                    Err(err) => println!("!! {err}"),
                }
            }
            "token" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next().and_then(|s| s.parse::<Uuid>().ok()), parts.next()) {
                    (Some(token), Some(user_id), Some(email)) => {
                        gateway.set_session(Session {
                            access_token: token.to_string(),
                            user: UserIdentity {
                                id: user_id,
                                email: email.to_string(),
                            },
                        });
                        println!("signed in as {email}");
                    }
                    _ => println!("usage: token <access-token> <user-id> <email>"),
                }
            }
            "logout" => {
                gateway.sign_out();
                println!("signed out");
            }
            "whoami" => match gateway.current_session() {
                Some(session) => {
                    println!("logged in as {} (user_id {})", session.user.email, session.user.id)
                }
                None => println!("not logged in"),
            },
            "fix" => match sessions.fix_account().await {
                Ok(()) => println!("account row ensured"),
                Err(err) => println!("ensure_user_row failed: {err}"),
            },
            "back" => {
                overlay.close();
                render_feed(&feed);
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("unknown command: {other} (try help)"),
        }
    }

    Ok(())
}

fn current_user(gateway: &Gateway) -> Option<Uuid> {
    gateway.current_session().map(|s| s.user.id)
}

fn nth_spark(feed: &FeedController<Gateway>, arg: &str) -> Option<Spark> {
    let n: usize = arg.parse().ok()?;
    feed.sparks().get(n.checked_sub(1)?).cloned()
}

fn status_label(status: SparkStatus) -> &'static str {
    match status {
        SparkStatus::Open => "Open for a partner",
        SparkStatus::Taken => "In progress",
        SparkStatus::Closed => "Closed",
    }
}

fn render_feed(feed: &FeedController<Gateway>) {
    let view = match feed.view() {
        FeedView::Feed => "Feed",
        FeedView::Mine => "My Conversations",
    };
    println!("── {view} ──");
    let sparks = feed.sparks();
    if sparks.is_empty() {
        println!("  no sparks yet — create one with: new <body>");
        return;
    }
    for (i, spark) in sparks.iter().enumerate() {
        let likes = match spark.likes {
            Some(n) if n > 0 => format!("  ♥ {n}"),
            _ => String::new(),
        };
        println!(
            "  {}. [{}]{} {}",
            i + 1,
            status_label(spark.status),
            likes,
            spark.body
        );
    }
}

fn render_conversation(overlay: &ConversationOverlay<Gateway>, gateway: &Gateway) {
    let Some(spark) = overlay.selected() else {
        return;
    };
    println!("── {} ──", spark.body);
    let me = current_user(gateway);
    let messages = overlay.sorted_messages();
    if messages.is_empty() {
        println!("  be the first to reply and start this dialogue");
    }
    for message in &messages {
        let marker = if me == Some(message.author_id) { "*" } else { " " };
        println!(" {marker}{}: {}", message.author_handle, message.body);
    }
    if overlay.composer_visible(me) {
        if spark.status == SparkStatus::Open {
            println!("  (reply <body> to contribute the first reply and claim this spark)");
        } else {
            println!("  (reply <body> to continue)");
        }
    } else {
        println!("  (read-only — follow it from the feed to get updates)");
    }
}

fn print_help() {
    println!(
        "commands: feed | mine | new <body> | open <n> | reply <body> | like <n> | follow <n>\n          login <email> | token <access-token> <user-id> <email> | logout | whoami | fix\n          back | help | quit"
    );
}
