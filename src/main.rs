use anyhow::Context;

fn main() -> anyhow::Result<()> {
    pixpaint::run().context("pixpaint session failed")
}
