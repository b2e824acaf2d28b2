//! Plain-text rendering for terminal output.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Write as _;

use session::{DirectoryStats, User, UserDirectory};

const HEADERS: [&str; 6] = ["ID", "USERNAME", "EMAIL", "ROLE", "STATUS", "CREATED"];

/// Profile block printed by `whoami` and after sign-in.
pub fn profile(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Username: {}", user.username);
    let _ = writeln!(out, "Email:    {}", user.email);
    let _ = writeln!(out, "Role:     {}", user.role);
    let _ = writeln!(out, "Status:   {}", user.status_label());
    let _ = write!(out, "Created:  {}", user.created_date().unwrap_or("N/A"));
    out
}

/// Column-aligned user table; the signed-in admin's row is marked `(you)`.
pub fn user_table(directory: &UserDirectory) -> String {
    let rows: Vec<[String; 6]> = directory
        .users()
        .iter()
        .map(|u| {
            let name = if directory.is_current_user(u.id) {
                format!("{} (you)", u.username)
            } else {
                u.username.clone()
            };
            [
                u.id.to_string(),
                name,
                u.email.clone(),
                u.role.to_string(),
                u.status_label().to_owned(),
                u.created_date().unwrap_or("N/A").to_owned(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_owned), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out.push_str(&stats_line(directory.stats()));
    out
}

/// Hint printed when the backend rejects the session; silent when this run
/// started without a stored token (a bad password at `login`).
pub fn expired_notice(had_session: bool) -> Option<&'static str> {
    had_session.then_some("session expired; sign in again with `authdash login <username>`")
}

pub fn stats_line(stats: DirectoryStats) -> String {
    format!(
        "total: {}  users: {}  admins: {}  active: {}",
        stats.total, stats.regular, stats.admins, stats.active
    )
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
