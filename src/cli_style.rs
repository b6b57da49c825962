//! Terminal styling for the interactive shell.

use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Color as CtColor, Stylize};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    let accent = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Green)));
    let title = Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
    let failure = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Red)));

    Styles::styled()
        .usage(title)
        .header(title)
        .literal(accent)
        .valid(accent)
        .invalid(failure)
        .error(failure)
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Color Palette
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const CYAN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 255,
    };
    /// Streaming-service green, used for track names.
    pub const GREEN: Color = Color::Rgb {
        r: 30,
        g: 215,
        b: 96,
    };
    pub const PURPLE: Color = Color::Rgb {
        r: 180,
        g: 100,
        b: 255,
    };
    pub const MAGENTA: Color = Color::Rgb {
        r: 255,
        g: 0,
        b: 255,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 255,
        g: 165,
        b: 0,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const BLUE: Color = Color::Rgb {
        r: 100,
        g: 149,
        b: 237,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Box Drawing Characters
// ═══════════════════════════════════════════════════════════════════════════════

pub mod box_chars {
    pub const DOUBLE_TOP_LEFT: &str = "╔";
    pub const DOUBLE_TOP_RIGHT: &str = "╗";
    pub const DOUBLE_BOTTOM_LEFT: &str = "╚";
    pub const DOUBLE_BOTTOM_RIGHT: &str = "╝";
    pub const DOUBLE_HORIZONTAL: &str = "═";
    pub const DOUBLE_VERTICAL: &str = "║";

    pub const SINGLE_HORIZONTAL: &str = "─";
    pub const SINGLE_VERTICAL: &str = "│";

    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";

    pub const T_LEFT: &str = "├";
    pub const T_RIGHT: &str = "┤";
    pub const T_TOP: &str = "┬";
    pub const T_BOTTOM: &str = "┴";
    pub const CROSS: &str = "┼";

    pub const NOTE: &str = "♪";
    pub const BULLET: &str = "●";
    pub const BULLET_EMPTY: &str = "○";
    pub const DIAMOND: &str = "◆";
    pub const CHECK: &str = "✓";
    pub const CROSS_MARK: &str = "✗";
}

// ═══════════════════════════════════════════════════════════════════════════════
// Banner
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_banner() {
    let banner = r#"
     █████╗ ██╗   ██╗████████╗ ██████╗ ███████╗██████╗  ██████╗ ████████╗██╗███████╗██╗   ██╗
    ██╔══██╗██║   ██║╚══██╔══╝██╔═══██╗██╔════╝██╔══██╗██╔═══██╗╚══██╔══╝██║██╔════╝╚██╗ ██╔╝
    ███████║██║   ██║   ██║   ██║   ██║███████╗██████╔╝██║   ██║   ██║   ██║█████╗   ╚████╔╝
    ██╔══██║██║   ██║   ██║   ██║   ██║╚════██║██╔═══╝ ██║   ██║   ██║   ██║██╔══╝    ╚██╔╝
    ██║  ██║╚██████╔╝   ██║   ╚██████╔╝███████║██║     ╚██████╔╝   ██║   ██║██║        ██║
    ╚═╝  ╚═╝ ╚═════╝    ╚═╝    ╚═════╝ ╚══════╝╚═╝      ╚═════╝    ╚═╝   ╚═╝╚═╝        ╚═╝
"#;

    let gradient = [
        colors::GREEN,
        colors::GREEN,
        colors::CYAN,
        colors::CYAN,
        colors::PURPLE,
        colors::PURPLE,
        colors::MAGENTA,
    ];
    for (i, line) in banner.lines().enumerate() {
        let color = gradient.get(i).unwrap_or(&colors::GREEN);
        println!("{}", line.with(*color).bold());
    }

    let subtitle = "  ══════════════════  MUSIC RECOMMENDATION ASSISTANT  ══════════════════";
    println!("{}", subtitle.with(colors::DIM));
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicators
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    println!(
        " {} {}",
        box_chars::CHECK.with(colors::GREEN).bold(),
        message.with(colors::GREEN)
    );
}

pub fn print_error(message: &str) {
    println!(
        " {} {}",
        box_chars::CROSS_MARK.with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

pub fn print_warning(message: &str) {
    println!(
        " {} {}",
        "⚠".with(colors::ORANGE).bold(),
        message.with(colors::ORANGE)
    );
}

pub fn print_info(message: &str) {
    println!(
        " {} {}",
        "ℹ".with(colors::BLUE).bold(),
        message.with(colors::BLUE)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sections
// ═══════════════════════════════════════════════════════════════════════════════

const SECTION_WIDTH: usize = 60;

pub fn print_section_header(title: &str) {
    let title_len = title.width();
    let left = SECTION_WIDTH.saturating_sub(title_len + 4) / 2;
    let right = SECTION_WIDTH.saturating_sub(title_len + 4 + left);

    println!();
    println!(
        "{}{} {} {}{}",
        box_chars::ROUND_TOP_LEFT.with(colors::CYAN),
        box_chars::SINGLE_HORIZONTAL.repeat(left).with(colors::CYAN),
        title.with(colors::CYAN).bold().attribute(Attribute::Italic),
        box_chars::SINGLE_HORIZONTAL.repeat(right).with(colors::CYAN),
        box_chars::ROUND_TOP_RIGHT.with(colors::CYAN)
    );
}

pub fn print_section_footer() {
    println!(
        "{}{}{}",
        box_chars::ROUND_BOTTOM_LEFT.with(colors::CYAN),
        box_chars::SINGLE_HORIZONTAL
            .repeat(SECTION_WIDTH)
            .with(colors::CYAN),
        box_chars::ROUND_BOTTOM_RIGHT.with(colors::CYAN)
    );
    println!();
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::BULLET.with(colors::PURPLE),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

pub fn print_reply(reply: &str) {
    for line in reply.lines().filter(|l| !l.trim().is_empty()) {
        println!(
            "  {} {}",
            box_chars::DIAMOND.with(colors::MAGENTA),
            line.with(colors::WHITE).attribute(Attribute::Italic)
        );
    }
}

pub fn print_empty_list(message: &str) {
    println!(
        "  {} {}",
        box_chars::BULLET_EMPTY.with(colors::DIM),
        message.with(colors::DIM).attribute(Attribute::Italic)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Table Display
// ═══════════════════════════════════════════════════════════════════════════════

/// Box-drawn table; column widths follow the display width of the cells.
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: &[&str]) -> Self {
        TableBuilder {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            col_widths: headers.iter().map(|h| h.width()).collect(),
        }
    }

    /// Add a row; cells beyond the header count are dropped, missing ones left blank.
    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) {
        let mut cells = Vec::with_capacity(self.headers.len());
        for i in 0..self.headers.len() {
            let cell = row.get(i).map(|c| c.as_ref()).unwrap_or("");
            self.col_widths[i] = self.col_widths[i].max(cell.width());
            cells.push(cell.to_string());
        }
        self.rows.push(cells);
    }

    pub fn col_widths(&self) -> &[usize] {
        &self.col_widths
    }

    fn border(&self, left: &str, junction: &str, right: &str) -> String {
        let segments: Vec<String> = self
            .col_widths
            .iter()
            .map(|w| box_chars::SINGLE_HORIZONTAL.repeat(w + 2))
            .collect();
        format!("{}{}{}", left, segments.join(junction), right)
    }

    fn print_cells(&self, cells: &[String], color: CtColor, bold: bool) {
        print!("{}", box_chars::SINGLE_VERTICAL.with(colors::CYAN));
        for (cell, width) in cells.iter().zip(&self.col_widths) {
            let padding = " ".repeat(width.saturating_sub(cell.width()));
            let styled = if bold {
                cell.as_str().with(color).bold()
            } else {
                cell.as_str().with(color)
            };
            print!(" {}{} ", styled, padding);
            print!("{}", box_chars::SINGLE_VERTICAL.with(colors::CYAN));
        }
        println!();
    }

    pub fn print(&self) {
        if self.col_widths.is_empty() {
            return;
        }
        let top = self.border(
            box_chars::ROUND_TOP_LEFT,
            box_chars::T_TOP,
            box_chars::ROUND_TOP_RIGHT,
        );
        let separator = self.border(box_chars::T_LEFT, box_chars::CROSS, box_chars::T_RIGHT);
        let bottom = self.border(
            box_chars::ROUND_BOTTOM_LEFT,
            box_chars::T_BOTTOM,
            box_chars::ROUND_BOTTOM_RIGHT,
        );

        println!("{}", top.with(colors::CYAN));
        self.print_cells(&self.headers, colors::CYAN, true);
        println!("{}", separator.with(colors::CYAN));
        for row in &self.rows {
            self.print_cells(row, colors::WHITE, false);
        }
        println!("{}", bottom.with(colors::CYAN));
    }
}

pub const TRACK_TABLE_HEADERS: [&str; 3] = ["#", "Track", "Artist"];

/// One numbered row per `(name, artist)` pair, starting at 1.
pub fn track_table<'a>(tracks: impl IntoIterator<Item = (&'a str, &'a str)>) -> TableBuilder {
    let mut table = TableBuilder::new(&TRACK_TABLE_HEADERS);
    for (i, (name, artist)) in tracks.into_iter().enumerate() {
        table.add_row(&[(i + 1).to_string().as_str(), name, artist]);
    }
    table
}

// ═══════════════════════════════════════════════════════════════════════════════
// Prompt
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_prompt() -> String {
    format!(
        "{}{} ",
        box_chars::NOTE.with(colors::GREEN).bold(),
        "❯".with(colors::CYAN).bold(),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Welcome
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_welcome(entries: &[(&str, &str)]) {
    print_banner();

    let box_width: usize = 64;
    let horizontal = box_chars::DOUBLE_HORIZONTAL.repeat(box_width);
    let blank = " ".repeat(box_width);
    let vertical = box_chars::DOUBLE_VERTICAL.with(colors::PURPLE);

    println!(
        "  {}{}{}",
        box_chars::DOUBLE_TOP_LEFT.with(colors::PURPLE),
        horizontal.as_str().with(colors::PURPLE),
        box_chars::DOUBLE_TOP_RIGHT.with(colors::PURPLE)
    );
    for (key, value) in entries {
        let visible = format!("  {}: {}", key, value);
        println!(
            "  {}  {} {}{}{}",
            vertical,
            format!("{}:", key).with(colors::DIM),
            value.with(colors::WHITE),
            " ".repeat(box_width.saturating_sub(visible.width())),
            vertical
        );
    }
    println!("  {}{}{}", vertical, blank, vertical);

    let help_msg = "  Type a request, or 'help' for commands";
    println!(
        "  {}{}{}{}",
        vertical,
        help_msg.with(colors::DIM),
        " ".repeat(box_width.saturating_sub(help_msg.width())),
        vertical
    );
    println!(
        "  {}{}{}",
        box_chars::DOUBLE_BOTTOM_LEFT.with(colors::PURPLE),
        horizontal.as_str().with(colors::PURPLE),
        box_chars::DOUBLE_BOTTOM_RIGHT.with(colors::PURPLE)
    );
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Help
// ═══════════════════════════════════════════════════════════════════════════════

pub struct CommandHelp {
    pub name: &'static str,
    pub args: &'static str,
    pub description: &'static str,
}

pub fn print_help(groups: &[(&str, &[CommandHelp])]) {
    print_section_header("Available Commands");
    println!();

    let palette = [colors::GREEN, colors::CYAN, colors::ORANGE];
    for (i, (title, commands)) in groups.iter().enumerate() {
        let color = palette[i % palette.len()];
        println!(
            "  {} {}",
            box_chars::DIAMOND.with(color),
            title.with(color).bold()
        );
        for cmd in commands.iter() {
            println!(
                "      {} {}  {}",
                cmd.name.with(colors::GREEN).bold(),
                cmd.args.with(colors::DIM),
                cmd.description.with(colors::WHITE)
            );
        }
        println!();
    }

    print_section_footer();
}

pub fn print_goodbye() {
    println!();
    println!(
        "  {} {}",
        box_chars::NOTE.with(colors::GREEN),
        "Goodbye! Enjoy the music.".with(colors::PURPLE).bold()
    );
    println!();
}
