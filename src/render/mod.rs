use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use longway::{Act, Node, RouteCursor};

pub const COL_SPACING: i32 = 6;
pub const ROW_SPACING: i32 = 2;

/// Colours for the route view; passed in rather than held globally.
#[derive(Clone, Debug)]
pub struct Palette {
    pub node: RGB,
    pub allowed: RGB,
    pub visited: RGB,
    pub cursor_fg: RGB,
    pub cursor_bg: RGB,
    pub edge: RGB,
    pub title: RGB,
    pub text: RGB,
    pub dim: RGB,
    pub background: RGB,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            node: RGB::from_u8(182, 238, 166),
            allowed: RGB::named(LIGHT_GREEN),
            visited: RGB::named(LIGHT_CYAN),
            cursor_fg: RGB::from_u8(30, 30, 46),
            cursor_bg: RGB::from_u8(240, 217, 74),
            edge: RGB::from_u8(108, 112, 134),
            title: RGB::from_u8(240, 217, 74),
            text: RGB::named(WHITE),
            dim: RGB::named(DARK_GRAY),
            background: RGB::named(BLACK),
        }
    }
}

pub struct RouteHud;

impl RouteHud {
    pub const fn new() -> Self {
        Self
    }

    pub fn draw(
        &self,
        ctx: &mut BTerm,
        palette: &Palette,
        seed: u64,
        act_index: usize,
        act_count: usize,
    ) {
        let (width, _) = ctx.get_char_size();
        let width = width as i32;
        ctx.draw_box(0, 0, width - 1, 4, palette.edge, palette.background);
        ctx.print_color(2, 1, palette.title, palette.background, "Long Way To The Top");
        ctx.print_color(
            2,
            2,
            palette.text,
            palette.background,
            format!("Seed {seed} · Act {}/{act_count}", act_index + 1),
        );
        ctx.print_color(
            2,
            3,
            palette.dim,
            palette.background,
            "h/l move · j advance · k back · 1-9 pick · [ ] act · r reroll · q quit",
        );
    }
}

pub fn node_point(origin: Point, row: usize, col: usize) -> Point {
    Point::new(
        origin.x + col as i32 * COL_SPACING,
        origin.y + row as i32 * ROW_SPACING,
    )
}

pub fn draw_act(
    ctx: &mut BTerm,
    palette: &Palette,
    act: &Act,
    cursor: &RouteCursor,
    origin: Point,
) {
    let path = cursor.path();
    for (row, nodes) in act.rows.iter().enumerate() {
        let label_point = node_point(origin, row, 0);
        ctx.print_color(
            label_point.x - 5,
            label_point.y,
            palette.dim,
            palette.background,
            format!("{:>2}", row + 1),
        );

        for (col, node) in nodes.iter().enumerate() {
            let point = node_point(origin, row, col);
            let here = row == cursor.row() && col == cursor.col();
            let (fg, bg) = if here {
                (palette.cursor_fg, palette.cursor_bg)
            } else if path.contains(&(row, col)) {
                (palette.visited, palette.background)
            } else if row == cursor.row() && cursor.allowed().contains(&col) {
                (palette.allowed, palette.background)
            } else {
                (palette.node, palette.background)
            };
            ctx.set(point.x, point.y, fg, bg, to_cp437(node.kind.glyph()));

            if row + 1 < act.rows.len() {
                draw_edges(ctx, palette, act, origin, row, col);
            }
        }
    }
}

fn draw_edges(
    ctx: &mut BTerm,
    palette: &Palette,
    act: &Act,
    origin: Point,
    row: usize,
    col: usize,
) {
    let from = node_point(origin, row, col);
    for target in act.targets_from(row, col) {
        let to = node_point(origin, row + 1, target);
        let glyph = match to.x.cmp(&from.x) {
            std::cmp::Ordering::Less => '/',
            std::cmp::Ordering::Equal => '|',
            std::cmp::Ordering::Greater => '\\',
        };
        ctx.set(
            (from.x + to.x) / 2,
            from.y + 1,
            palette.edge,
            palette.background,
            to_cp437(glyph),
        );
    }
}

pub fn draw_preview(
    ctx: &mut BTerm,
    palette: &Palette,
    node: Option<&Node>,
    picked: &[usize],
    top_left: Point,
    width: i32,
    height: i32,
) {
    ctx.draw_box(
        top_left.x,
        top_left.y,
        width,
        height,
        palette.edge,
        palette.background,
    );
    let Some(node) = node else {
        ctx.print_color(
            top_left.x + 2,
            top_left.y + 1,
            palette.dim,
            palette.background,
            "No node selected",
        );
        return;
    };

    let inner = (width - 3).max(1) as usize;
    let mut y = top_left.y + 1;
    let bottom = top_left.y + height;
    let challenge = &node.challenge;
    ctx.print_color(
        top_left.x + 2,
        y,
        palette.title,
        palette.background,
        format!("{} · {}", node.kind.as_str(), challenge.name),
    );
    y += 1;
    for line in wrap(&challenge.summary, inner) {
        if y >= bottom {
            return;
        }
        ctx.print_color(top_left.x + 2, y, palette.text, palette.background, line);
        y += 1;
    }
    y += 1;
    for (idx, song) in challenge.songs.iter().enumerate() {
        if y >= bottom {
            return;
        }
        let mark = if picked.contains(&idx) { '*' } else { ' ' };
        let mut line = format!("{mark}{}. {} - {}", idx + 1, song.title, song.artist);
        if song.year > 0 {
            line.push_str(&format!(" ({})", song.year));
        }
        let cut = line.char_indices().nth(inner).map_or(line.len(), |(i, _)| i);
        line.truncate(cut);
        let fg = if picked.contains(&idx) {
            palette.visited
        } else {
            palette.node
        };
        ctx.print_color(top_left.x + 2, y, fg, palette.background, line);
        y += 1;
    }
}

pub fn draw_log(ctx: &mut BTerm, palette: &Palette, log: &[String], start_y: i32) {
    let (width, _) = ctx.get_char_size();
    let width = width as i32;
    let height = (log.len() as i32).min(5) + 2;
    let top = (start_y - 1).max(0);
    ctx.draw_box(0, top, width - 1, height, palette.dim, palette.background);
    ctx.print_color(2, top + 1, palette.text, palette.background, "Event Log");
    for (row, entry) in log.iter().take(5).enumerate() {
        ctx.print(2, top + 2 + row as i32, entry);
    }
}

/// Greedy word wrap; words longer than `width` get their own line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("Pick any 3 of these 12 tracks from the 1980s.", 16);
        assert_eq!(
            lines,
            vec!["Pick any 3 of", "these 12 tracks", "from the 1980s."]
        );
        assert!(wrap("", 10).is_empty());
    }

    #[test]
    fn nodes_are_spaced_on_a_grid() {
        let origin = Point::new(6, 8);
        assert_eq!(node_point(origin, 0, 0), Point::new(6, 8));
        assert_eq!(node_point(origin, 2, 3), Point::new(24, 12));
    }
}
