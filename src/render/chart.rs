use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use kurbo::{BezPath, Point};

use crate::config::AppConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::{FrameRenderer, FrameRequest};

/// Line colours, picked by a symbol's position in [`ChartStyle::symbols`].
pub const PLOT_COLORS: [&str; 10] = [
    "#FF6347", "#4682B4", "#32CD32", "#FFD700", "#DA70D6", "#FFA500", "#00CED1", "#8A2BE2",
    "#FF4500", "#1E90FF",
];

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 100.0;
const MAX_X_TICKS: usize = 10;
const Y_GRID_LINES: usize = 5;

#[derive(Clone, Debug)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub quote_currency: String,
    pub watermark: Option<String>,
    pub symbols: Vec<String>,
}

impl ChartStyle {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            width: cfg.render.width,
            height: cfg.render.height,
            quote_currency: cfg.source.base_currency.clone(),
            watermark: cfg.render.watermark.clone(),
            symbols: cfg.render.symbols.clone(),
        }
    }

    /// Line colour for `symbol`; unknown symbols get the first palette entry.
    pub fn color_for(&self, symbol: &str) -> &'static str {
        let idx = self
            .symbols
            .iter()
            .position(|s| s.eq_ignore_ascii_case(symbol))
            .unwrap_or(0);
        PLOT_COLORS[idx % PLOT_COLORS.len()]
    }
}

/// Draws a progressively revealed line chart.
///
/// The x axis always spans the whole series so the line grows left to right; the y axis fits
/// the values revealed so far with 10% headroom.
pub struct ChartRenderer {
    style: ChartStyle,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ChartRenderer {
    /// Create a renderer using the fonts installed on the system.
    pub fn new(style: ChartStyle) -> ReelResult<Self> {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self::with_fontdb(style, Arc::new(db))
    }

    pub fn with_fontdb(
        style: ChartStyle,
        fontdb: Arc<usvg::fontdb::Database>,
    ) -> ReelResult<Self> {
        if style.width == 0 || style.height == 0 {
            return Err(ReelError::render("chart width/height must be non-zero"));
        }
        if f64::from(style.width) <= MARGIN_LEFT + MARGIN_RIGHT
            || f64::from(style.height) <= MARGIN_TOP + MARGIN_BOTTOM
        {
            return Err(ReelError::render(format!(
                "chart size {}x{} leaves no room for the plot area",
                style.width, style.height
            )));
        }
        Ok(Self { style, fontdb })
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Build the SVG document for one frame.
    pub fn chart_svg(&self, req: &FrameRequest<'_>) -> ReelResult<String> {
        let points = req.series.points();
        let upto = req.index.0;
        let Some(current) = points.get(upto) else {
            return Err(ReelError::invalid_input(format!(
                "frame index {upto} is outside a series of {} points",
                points.len()
            )));
        };

        let w = f64::from(self.style.width);
        let h = f64::from(self.style.height);
        let plot = PlotArea {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: w - MARGIN_LEFT - MARGIN_RIGHT,
            height: h - MARGIN_TOP - MARGIN_BOTTOM,
        };
        let (y_lo, y_hi) = y_limits(points[..=upto].iter().map(|p| p.value));
        let x_span = points.len().saturating_sub(1).max(1) as f64;
        let to_px = |i: usize, v: f64| {
            Point::new(
                plot.left + (i as f64) / x_span * plot.width,
                plot.top + (y_hi - v) / (y_hi - y_lo) * plot.height,
            )
        };

        let color = self.style.color_for(req.symbol);
        let quote = xml_escape(&self.style.quote_currency);
        let symbol = xml_escape(req.symbol);
        let mut svg = String::with_capacity(8 * 1024);

        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#
        );
        let _ = write!(svg, r##"<rect width="{w}" height="{h}" fill="#ffffff"/>"##);

        if let Some(mark) = self.style.watermark.as_deref() {
            let _ = write!(
                svg,
                r#"<text x="{cx}" y="{cy}" font-size="50" fill="gray" fill-opacity="0.15" text-anchor="middle" dominant-baseline="middle" transform="rotate(-30 {cx} {cy})">{text}</text>"#,
                cx = w / 2.0,
                cy = h / 2.0,
                text = xml_escape(mark)
            );
        }

        let _ = write!(
            svg,
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#eeeeee" fill-opacity="0.6"/>"##,
            plot.left, plot.top, plot.width, plot.height
        );

        for g in 0..=Y_GRID_LINES {
            let frac = g as f64 / Y_GRID_LINES as f64;
            let y = plot.top + frac * plot.height;
            let v = y_hi - frac * (y_hi - y_lo);
            let _ = write!(
                svg,
                r##"<line x1="{x0}" y1="{y}" x2="{x1}" y2="{y}" stroke="#b0b0b0" stroke-width="1" stroke-dasharray="1 3"/><text x="{tx}" y="{y}" font-size="12" text-anchor="end" dominant-baseline="middle" fill="#333333">{v:.2}</text>"##,
                x0 = plot.left,
                x1 = plot.left + plot.width,
                tx = plot.left - 8.0,
            );
        }

        let tick_spacing = x_tick_spacing(points.len());
        for i in (0..points.len()).step_by(tick_spacing) {
            let x = to_px(i, y_lo).x;
            let y = plot.top + plot.height;
            let _ = write!(
                svg,
                r##"<line x1="{x}" y1="{}" x2="{x}" y2="{y}" stroke="#b0b0b0" stroke-width="1" stroke-dasharray="1 3"/><text x="{x}" y="{ty}" font-size="12" text-anchor="end" fill="#333333" transform="rotate(-30 {x} {ty})">{label}</text>"##,
                plot.top,
                ty = y + 18.0,
                label = xml_escape(&points[i].label)
            );
        }

        let mut path = BezPath::new();
        for (i, p) in points[..=upto].iter().enumerate() {
            let pt = to_px(i, p.value);
            if i == 0 {
                path.move_to(pt);
            } else {
                path.line_to(pt);
            }
        }
        let head = to_px(upto, current.value);
        let _ = write!(
            svg,
            r#"<path d="{}" fill="none" stroke="{color}" stroke-width="2" stroke-linejoin="round"/><circle cx="{}" cy="{}" r="4" fill="{color}"/>"#,
            path.to_svg(),
            head.x,
            head.y
        );

        let _ = write!(
            svg,
            r##"<line x1="{lx0}" y1="{ly}" x2="{lx1}" y2="{ly}" stroke="{color}" stroke-width="2"/><text x="{tx}" y="{ly}" font-size="14" dominant-baseline="middle" fill="#222222">{symbol} Price</text>"##,
            lx0 = plot.left + 12.0,
            lx1 = plot.left + 40.0,
            ly = plot.top + 18.0,
            tx = plot.left + 48.0,
        );

        let _ = write!(
            svg,
            r##"<text x="{cx}" y="{by}" font-size="14" text-anchor="middle" fill="#222222">Date</text><text x="20" y="{cy}" font-size="14" text-anchor="middle" fill="#222222" transform="rotate(-90 20 {cy})">Price ({quote})</text>"##,
            cx = plot.left + plot.width / 2.0,
            by = h - 12.0,
            cy = plot.top + plot.height / 2.0,
        );

        let _ = write!(
            svg,
            r##"<text x="{cx}" y="40" font-size="20" font-weight="bold" text-anchor="middle" fill="#111111">{symbol} | {label} | Price: {value:.2} {quote}</text>"##,
            cx = w / 2.0,
            label = xml_escape(&current.label),
            value = current.value,
        );

        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Rasterize an SVG document into straight-alpha RGBA8 pixels.
    pub fn rasterize(&self, svg: &str) -> ReelResult<Vec<u8>> {
        let mut opts = usvg::Options::default();
        opts.fontdb = self.fontdb.clone();
        let tree = usvg::Tree::from_str(svg, &opts)
            .map_err(|e| ReelError::render(format!("parse chart svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(self.style.width, self.style.height)
            .ok_or_else(|| ReelError::render("failed to allocate chart pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::default(),
            &mut pixmap.as_mut(),
        );

        let mut rgba = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(rgba)
    }
}

impl FrameRenderer for ChartRenderer {
    fn render_frame(&self, req: &FrameRequest<'_>, out_path: &Path) -> ReelResult<()> {
        let svg = self.chart_svg(req)?;
        let rgba = self.rasterize(&svg)?;
        image::save_buffer_with_format(
            out_path,
            &rgba,
            self.style.width,
            self.style.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| ReelError::render(format!("write png '{}': {e}", out_path.display())))?;
        tracing::trace!(frame = req.ordinal, path = %out_path.display(), "rendered frame");
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

/// Y axis limits with 10% headroom on either side of the revealed values.
fn y_limits(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let lo = lo - 0.1 * lo.abs();
    let hi = hi + 0.1 * hi.abs();
    if hi - lo < 1e-9 {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

fn x_tick_spacing(n: usize) -> usize {
    let ticks = n.clamp(1, MAX_X_TICKS);
    (n / ticks).max(1)
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/chart.rs"]
mod tests;
