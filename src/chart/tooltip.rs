//! Tooltip text and the hover behaviour of heatmap cells.
//!
//! [`HoverState`] holds the hover rules. The rendered page runs the same rules
//! through [`HoverState::script`], which is built from the constants below, so
//! the behaviour can be exercised without a browser.

use crate::chart::render::Cell;

/// Horizontal offset of the tooltip from the hovered cell's left edge.
pub const TOOLTIP_OFFSET_X: f64 = -100.0;
pub const TOOLTIP_VISIBLE_OPACITY: f64 = 1.0;
pub const TOOLTIP_HIDDEN_OPACITY: f64 = 0.0;

/// What the tooltip says about one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    /// Absolute temperature, base plus variance.
    pub temperature: f64,
    pub variance: f64,
    /// `Month Year`, e.g. `January 1753`.
    pub label: String,
    pub year: i32,
}

impl TooltipContent {
    pub fn new(base_temperature: f64, variance: f64, label: String, year: i32) -> Self {
        Self {
            temperature: base_temperature + variance,
            variance,
            label,
            year,
        }
    }

    /// Absolute temperature with three decimals, e.g. `8.437℃`.
    pub fn temperature_text(&self) -> String {
        format!("{:.3}℃", self.temperature)
    }

    pub fn variance_text(&self) -> String {
        format!("{}℃", self.variance)
    }

    /// Plain-text form, used for the SVG `<title>` of a cell.
    pub fn text(&self) -> String {
        format!(
            "Land-surface temperature: {}\nVariance: {}\nDate: {}",
            self.temperature_text(),
            self.variance_text(),
            self.label
        )
    }

    /// Markup placed inside the tooltip element on hover.
    pub fn html(&self) -> String {
        format!(
            "Land-surface temperature: <b>{}</b><br>Variance: <b>{}</b><br><br>Date: <b>{}</b>",
            self.temperature_text(),
            self.variance_text(),
            self.label
        )
    }
}

/// Observable state of the tooltip element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipView {
    pub opacity: f64,
    pub left: f64,
    pub top: f64,
    /// Value of the tooltip's `data-year` attribute, set on first hover.
    pub data_year: Option<i32>,
    pub html: String,
}

/// Paint order of the cells plus the tooltip they share.
#[derive(Debug, Clone)]
pub struct HoverState {
    order: Vec<usize>,
    tooltip: TooltipView,
}

impl HoverState {
    /// Cells start in document order with the tooltip hidden.
    pub fn new(cell_count: usize) -> Self {
        Self {
            order: (0..cell_count).collect(),
            tooltip: TooltipView::default(),
        }
    }

    /// Raises the cell above its siblings and shows its tooltip next to it.
    pub fn mouse_over(&mut self, index: usize, cell: &Cell) {
        if let Some(position) = self.order.iter().position(|&i| i == index) {
            let raised = self.order.remove(position);
            self.order.push(raised);
        }
        self.tooltip.opacity = TOOLTIP_VISIBLE_OPACITY;
        self.tooltip.left = cell.x + TOOLTIP_OFFSET_X;
        self.tooltip.top = cell.y;
        self.tooltip.data_year = Some(cell.year);
        self.tooltip.html = cell.tooltip.html();
    }

    /// Hides the tooltip. Content, position and paint order are left as they were.
    pub fn mouse_out(&mut self) {
        self.tooltip.opacity = TOOLTIP_HIDDEN_OPACITY;
    }

    pub fn tooltip(&self) -> &TooltipView {
        &self.tooltip
    }

    /// Cell indices from bottom-most to top-most.
    pub fn paint_order(&self) -> &[usize] {
        &self.order
    }

    /// Browser form of [`HoverState::mouse_over`] and [`HoverState::mouse_out`],
    /// bound to every `rect.cell` of a page.
    ///
    /// Raising is done by re-appending the cell to its parent. The tooltip markup
    /// comes from the cell's `data-tooltip` attribute, which holds
    /// [`TooltipContent::html`].
    pub fn script() -> String {
        format!(
            "const tooltip = document.getElementById(\"tooltip\");\n\
document.querySelectorAll(\"rect.cell\").forEach((cell) => {{\n\
  cell.addEventListener(\"mouseover\", () => {{\n\
    cell.parentNode.appendChild(cell);\n\
    tooltip.style.opacity = {visible};\n\
    tooltip.style.left = (+cell.getAttribute(\"x\") + ({offset})) + \"px\";\n\
    tooltip.style.top = cell.getAttribute(\"y\") + \"px\";\n\
    tooltip.setAttribute(\"data-year\", cell.getAttribute(\"data-year\"));\n\
    tooltip.innerHTML = cell.getAttribute(\"data-tooltip\");\n\
  }});\n\
  cell.addEventListener(\"mouseout\", () => {{\n\
    tooltip.style.opacity = {hidden};\n\
  }});\n\
}});",
            visible = TOOLTIP_VISIBLE_OPACITY,
            hidden = TOOLTIP_HIDDEN_OPACITY,
            offset = TOOLTIP_OFFSET_X,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::color::Rgb;

    fn cell(x: f64, y: f64, year: i32, variance: f64) -> Cell {
        Cell {
            x,
            y,
            width: 4.0,
            height: 47.5,
            fill: Rgb(0, 0, 4),
            month_index: 0,
            year,
            variance,
            tooltip: TooltipContent::new(8.66, variance, format!("January {}", year), year),
        }
    }

    #[test]
    fn test_temperature_has_three_decimals() {
        let content = TooltipContent::new(8.66, -0.223, "April 1900".to_string(), 1900);
        assert_eq!(content.temperature_text(), "8.437℃");
        assert_eq!(content.variance_text(), "-0.223℃");
        assert_eq!(
            content.html(),
            "Land-surface temperature: <b>8.437℃</b><br>Variance: <b>-0.223℃</b><br><br>Date: <b>April 1900</b>"
        );
        assert!(content.text().ends_with("Date: April 1900"));
    }

    #[test]
    fn test_mouse_over_raises_and_shows() {
        let cells = vec![cell(120.0, 30.0, 1753, -1.366), cell(124.0, 30.0, 1754, 0.5)];
        let mut hover = HoverState::new(cells.len());
        assert_eq!(hover.tooltip().opacity, 0.0);

        hover.mouse_over(0, &cells[0]);
        assert_eq!(hover.paint_order(), &[1, 0]);
        let tooltip = hover.tooltip();
        assert_eq!(tooltip.opacity, 1.0);
        assert_eq!(tooltip.left, 20.0);
        assert_eq!(tooltip.top, 30.0);
        assert_eq!(tooltip.data_year, Some(1753));
        assert!(tooltip.html.contains("7.294℃"));
    }

    #[test]
    fn test_mouse_out_hides_but_keeps_order() {
        let cells = vec![cell(120.0, 30.0, 1753, -1.366), cell(124.0, 30.0, 1754, 0.5)];
        let mut hover = HoverState::new(cells.len());
        hover.mouse_over(0, &cells[0]);
        hover.mouse_out();
        assert_eq!(hover.tooltip().opacity, 0.0);
        assert_eq!(hover.tooltip().data_year, Some(1753));
        assert_eq!(hover.paint_order(), &[1, 0]);

        hover.mouse_over(1, &cells[1]);
        assert_eq!(hover.paint_order(), &[0, 1]);
        assert_eq!(hover.tooltip().data_year, Some(1754));
    }

    #[test]
    fn test_script_applies_the_same_rules() {
        let script = HoverState::script();
        let (over, out) = script
            .split_once("addEventListener(\"mouseout\"")
            .expect("script has a mouseout handler");
        let over = over
            .split_once("addEventListener(\"mouseover\"")
            .expect("script has a mouseover handler")
            .1;

        let statements = [
            "cell.parentNode.appendChild(cell);",
            "tooltip.style.opacity = 1;",
            "tooltip.style.left = (+cell.getAttribute(\"x\") + (-100)) + \"px\";",
            "tooltip.style.top = cell.getAttribute(\"y\") + \"px\";",
            "tooltip.setAttribute(\"data-year\", cell.getAttribute(\"data-year\"));",
            "tooltip.innerHTML = cell.getAttribute(\"data-tooltip\");",
        ];
        let positions: Vec<usize> = statements
            .iter()
            .map(|s| over.find(s).unwrap_or_else(|| panic!("missing {s}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(out.contains("tooltip.style.opacity = 0;"));
        assert!(!out.contains("appendChild"));
        assert!(!out.contains("innerHTML"));
    }
}
