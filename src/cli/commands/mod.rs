mod add;
mod ci;
mod init;
mod install;
mod remove;
mod run;

pub(crate) use add::cmd_add;
pub(crate) use ci::cmd_ci;
pub(crate) use init::cmd_init;
pub(crate) use install::cmd_install;
pub(crate) use remove::cmd_remove;
pub(crate) use run::cmd_run;

/// Render an error with its full source chain on one line.
pub(crate) fn render_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        out.push_str(": ");
        out.push_str(&s.to_string());
        source = s.source();
    }
    out
}
