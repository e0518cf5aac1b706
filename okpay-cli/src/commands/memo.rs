use crate::state::AppState;
use clap::Args;

#[derive(Args, Debug)]
pub struct MemoArgs {
    /// Start a new session with a fresh memo
    #[arg(long)]
    pub reset: bool,
}

pub fn run(state: &AppState, args: MemoArgs) -> anyhow::Result<()> {
    let session = state.memo_session();
    let memo = if args.reset {
        session.reset()
    } else {
        session.load_or_generate()
    };
    println!("{memo}");
    Ok(())
}
