mod albums;
mod audio;
mod chrome;
mod config;
mod contact;
mod dom;
mod events;
mod fetch;
mod gallery;
mod i18n;
mod player;
mod press;
mod privacy;
mod runtime;
mod site;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
