//! Terminal front-end for the inventory tracker.

use std::io::Write as _;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use invtrack_client::view::{self, Command, ParseError};
use invtrack_client::{ClientConfig, HttpRemoteStore, InventoryStore, RemoteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    invtrack_observability::init();

    let config = ClientConfig::from_env();
    if config.auth_token.is_some() {
        tracing::info!("using inventory API at {} with authentication token", config.api_url);
    } else {
        tracing::info!("using inventory API at {}", config.api_url);
    }

    let mut store = InventoryStore::new(HttpRemoteStore::from_config(&config));
    store.load().await;
    print!("{}", view::render_table(store.items(), store.edit_state()));
    println!("{}", view::render_draft(store.draft()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(cmd) => run(&mut store, cmd).await,
            Err(ParseError::Empty) => {}
            Err(err) => {
                println!("{err}");
                print!("{}", view::help());
            }
        }
    }

    Ok(())
}

async fn run<R: RemoteStore>(store: &mut InventoryStore<R>, cmd: Command) {
    match cmd {
        Command::List => {}
        Command::Reload => {
            store.load().await;
        }
        Command::DraftType(t) => store.draft_mut().item_type = t,
        Command::DraftDescription(d) => store.draft_mut().description = d,
        Command::DraftState(s) => store.draft_mut().state = s,
        Command::Add => {
            store.create().await;
        }
        Command::Edit(id) => {
            store.begin_edit(&id);
        }
        Command::SetType(t) => with_buffer(store, |b| b.item_type = t),
        Command::SetDescription(d) => with_buffer(store, |b| b.description = d),
        Command::SetState(s) => with_buffer(store, |b| b.state = s),
        Command::Save => {
            store.save_edit().await;
        }
        Command::Delete(id) => {
            store.delete(&id).await;
        }
        Command::Help => {
            print!("{}", view::help());
            return;
        }
        Command::Quit => return,
    }

    print!("{}", view::render_table(store.items(), store.edit_state()));
    println!("{}", view::render_draft(store.draft()));
}

fn with_buffer<R: RemoteStore>(
    store: &mut InventoryStore<R>,
    apply: impl FnOnce(&mut invtrack_inventory::ItemFields),
) {
    match store.edit_buffer_mut() {
        Some(buffer) => apply(buffer),
        None => println!("no item is being edited; use `edit <id>` first"),
    }
}
