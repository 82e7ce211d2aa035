//! sshmark binary entry point

fn main() -> anyhow::Result<()> {
    sshmark::run()
}
