//! Demo commands.
//!
//! A small command set that exercises literals, filtered and greedy
//! parameters, entity lookups, dates, permissions, and sender filters.
//!
//! | Command                        | Notes                                 |
//! |--------------------------------|---------------------------------------|
//! | `/chunk preload <Whole #>`     | `min:0,max:32`, needs `switchback.chunk` |
//! | `/chunk status`                |                                       |
//! | `/chunk clear`                 | needs `switchback.chunk`              |
//! | `/msg`, `/msg <Player> <String...>` | bare form prints usage           |
//! | `/who`, `/who <Player>`        | second form accepts offline players   |
//! | `/remind <Date> <String...>`   | players only                          |
//! | `/commands`                    | every registered path                 |
//! | `/help`, `/help <String>`      | label metadata                        |

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use switchback_foundation::{EntityRef, Error, Result, SenderKind, Value};
use switchback_parser::{EntityDirectory, MemoryDirectory, names};
use switchback_router::{CommandContext, CommandSpec, HandlerId, ParamSpec, Router, SenderFilter};

/// Permission guarding chunk mutations.
pub const CHUNK_PERMISSION: &str = "switchback.chunk";

const OWNER: &str = "switchback-demo";

#[derive(Default)]
struct ChunkState {
    radius: Mutex<Option<i64>>,
}

/// Registers the demo commands.
///
/// # Errors
///
/// Fails if a command does not compile against the router's parser
/// registry (for example when no entity directory was installed).
pub fn register(router: &Arc<Router>, directory: &Arc<MemoryDirectory>) -> Result<Vec<HandlerId>> {
    let mut specs = chunk_commands();
    specs.extend(social_commands(directory));
    specs.extend(meta_commands(Arc::downgrade(router)));
    router.register_all(specs)
}

fn chunk_commands() -> Vec<CommandSpec> {
    let state = Arc::new(ChunkState::default());

    let preload = {
        let state = Arc::clone(&state);
        CommandSpec::new("chunk_preload", move |ctx| {
            let radius = ctx.args().int(0)?;
            *state.radius.lock() = Some(radius);
            ctx.reply(&format!("Preloading chunks within radius {radius}."));
            Ok(())
        })
        .path("chunk preload <?>")
        .param(ParamSpec::new(names::INT).filter("min:0,max:32"))
        .permission(CHUNK_PERMISSION)
    };

    let status = {
        let state = Arc::clone(&state);
        CommandSpec::new("chunk_status", move |ctx| {
            match *state.radius.lock() {
                Some(radius) => ctx.reply(&format!("Chunks preloaded within radius {radius}.")),
                None => ctx.reply("No chunks preloaded."),
            }
            Ok(())
        })
        .path("chunk status")
    };

    let clear = CommandSpec::new("chunk_clear", move |ctx| {
        state.radius.lock().take();
        ctx.reply("Cleared preloaded chunks.");
        Ok(())
    })
    .path("chunk clear")
    .permission(CHUNK_PERMISSION);

    [preload, status, clear]
        .into_iter()
        .map(|spec| spec.owner(OWNER).description("Manage preloaded chunks").usage("/chunk <preload|status|clear>"))
        .collect()
}

fn social_commands(directory: &Arc<MemoryDirectory>) -> Vec<CommandSpec> {
    let msg_usage = CommandSpec::new("msg_usage", |ctx| {
        ctx.reply("Usage: /msg <player> <message...>");
        Ok(())
    })
    .path("msg");

    let msg = CommandSpec::new("msg", |ctx| {
        let target = ctx.args().entity(0)?;
        let text = join_words(ctx.args().list(1)?);
        ctx.reply(&format!("[{} -> {}] {text}", ctx.sender().name(), target.name()));
        Ok(())
    })
    .path("msg <?>")
    .param(ParamSpec::new(names::PLAYER))
    .param(ParamSpec::new(names::STRING).greedy());

    let who = {
        let directory = Arc::clone(directory);
        CommandSpec::new("who", move |ctx| {
            let online = directory.online_names();
            ctx.reply(&format!("Online ({}): {}", online.len(), online.join(", ")));
            Ok(())
        })
        .path("who")
    };

    let who_is = {
        let directory = Arc::clone(directory);
        CommandSpec::new("who_is", move |ctx| {
            let entity = ctx.args().entity(0)?;
            ctx.reply(&describe(&*directory, entity));
            Ok(())
        })
        .path("who <?>")
        .param(ParamSpec::new(names::OFFLINE_PLAYER))
    };

    let remind = CommandSpec::new("remind", |ctx| {
        let at = ctx.args().datetime(0)?;
        let text = join_words(ctx.args().list(1)?);
        ctx.reply(&format!("Reminder set for {}: {text}", at.format("%Y-%m-%d %H:%M:%S")));
        Ok(())
    })
    .path("remind <?>")
    .param(ParamSpec::new(names::DATETIME))
    .param(ParamSpec::new(names::STRING).greedy())
    .sender(SenderFilter::Only(SenderKind::Player))
    .description("Schedule a reminder")
    .usage("/remind <time> <message...>");

    let mut specs: Vec<CommandSpec> = [msg_usage, msg]
        .into_iter()
        .map(|spec| spec.description("Send a private message").usage("/msg <player> <message...>"))
        .collect();
    specs.extend([who, who_is].into_iter().map(|spec| spec.description("List online players")));
    specs.push(remind);
    specs.into_iter().map(|spec| spec.owner(OWNER)).collect()
}

fn meta_commands(router: Weak<Router>) -> Vec<CommandSpec> {
    let commands = {
        let router = router.clone();
        CommandSpec::new("commands", move |ctx| {
            for line in upgrade(&router)?.all_commands() {
                ctx.reply(&line);
            }
            Ok(())
        })
        .path("commands")
        .description("List every command path")
    };

    let help = {
        let router = router.clone();
        CommandSpec::new("help", move |ctx| {
            let router = upgrade(&router)?;
            let prefix = &router.config().command_prefix;
            for label in router.labels() {
                match router.label_info(&label).and_then(|info| info.description) {
                    Some(description) => ctx.reply(&format!("{prefix}{label} - {description}")),
                    None => ctx.reply(&format!("{prefix}{label}")),
                }
            }
            Ok(())
        })
        .path("help")
        .description("Show help")
    };

    let topic = CommandSpec::new("help_topic", move |ctx| {
        let router = upgrade(&router)?;
        help_topic(&router, ctx)
    })
        .path("help <?>")
        .param(ParamSpec::new(names::STRING))
        .description("Show help");

    [commands, help, topic].into_iter().map(|spec| spec.owner(OWNER)).collect()
}

fn help_topic(router: &Router, ctx: &CommandContext<'_>) -> Result<()> {
    let topic = ctx.args().string(0)?;
    let topic = topic.strip_prefix('/').unwrap_or(topic);
    let Some(info) = router.label_info(topic) else {
        ctx.reply(&router.config().no_help_message);
        return Ok(());
    };
    let prefix = &router.config().command_prefix;
    ctx.reply(&format!(
        "{prefix}{} - {}",
        info.label,
        info.description.as_deref().unwrap_or("(no description)")
    ));
    if let Some(usage) = &info.usage {
        ctx.reply(&format!("Usage: {usage}"));
    }
    if let Some(owner) = &info.owner {
        ctx.reply(&format!("Registered by {owner}"));
    }
    Ok(())
}

fn describe(directory: &dyn EntityDirectory, entity: &EntityRef) -> String {
    if directory.online(entity.name()).is_some() {
        format!("{entity} is online.")
    } else {
        format!("{entity} is offline.")
    }
}

fn join_words(words: &[Value]) -> String {
    words.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

fn upgrade(router: &Weak<Router>) -> Result<Arc<Router>> {
    router.upgrade().ok_or_else(|| Error::internal("router was dropped"))
}
