//! The read-eval loop.
//!
//! One line is read, parsed and dispatched at a time; the loop waits for
//! the full dispatch to finish before reading again, so at most one
//! pipeline is ever in flight. Any command error or collaborator fault is
//! printed and the loop keeps going. Only `exit` or end-of-input ends it.

use std::ops::ControlFlow;
use std::sync::Arc;

use anyhow::Result;
use console::style;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::commands::CommandSet;
use crate::context::AppContext;
use crate::errors::CommandError;
use crate::grammar::MainCommand;
use crate::parser::ParsedInvocation;

pub async fn run<R>(ctx: Arc<AppContext>, commands: &CommandSet, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        println!();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.split(ctx.config.token_separator).all(|t| t.is_empty()) {
            continue;
        }

        match dispatch(&ctx, commands, &line).await {
            Ok(ControlFlow::Continue(())) => {}
            Ok(ControlFlow::Break(())) => break,
            Err(err) => println!("{}", style(err).red()),
        }
    }

    Ok(())
}

async fn dispatch(
    ctx: &AppContext,
    commands: &CommandSet,
    line: &str,
) -> Result<ControlFlow<()>, CommandError> {
    let invocation = ParsedInvocation::parse(line, ctx.config.token_separator)?;
    debug!(command = %invocation.command, "dispatching");

    if invocation.command == MainCommand::Exit {
        return Ok(ControlFlow::Break(()));
    }

    match commands.resolve(invocation.command) {
        Some(handler) => {
            handler.execute(ctx, &invocation.parameters).await?;
            Ok(ControlFlow::Continue(()))
        }
        None => Ok(ControlFlow::Continue(())),
    }
}
