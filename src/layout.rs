/// Viewport widths below this render the table in a scrolling frame.
pub const BREAKPOINT: u32 = 700;

/// Width the table is laid out at when constrained.
pub const VIRTUAL_TABLE_WIDTH: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// Fixed-width table scrolled horizontally inside the viewport.
    Constrained { virtual_width: u32 },
    /// Table takes the viewport width.
    Natural,
}

impl TableLayout {
    pub fn is_constrained(self) -> bool {
        matches!(self, Self::Constrained { .. })
    }
}

pub fn select_layout(width: u32) -> TableLayout {
    if width < BREAKPOINT {
        TableLayout::Constrained {
            virtual_width: VIRTUAL_TABLE_WIDTH,
        }
    } else {
        TableLayout::Natural
    }
}

/// Tracks the terminal width and the layout it implies.
///
/// Terminal columns are scaled by `units_per_cell` to get width units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    units_per_cell: u32,
    columns: u16,
    layout: TableLayout,
}

impl Viewport {
    pub fn new(units_per_cell: u32, columns: u16) -> Self {
        let units_per_cell = units_per_cell.max(1);
        Self {
            units_per_cell,
            columns,
            layout: select_layout(u32::from(columns) * units_per_cell),
        }
    }

    /// Record a new terminal width. Returns the layout when it changed.
    pub fn observe(&mut self, columns: u16) -> Option<TableLayout> {
        if columns == self.columns {
            return None;
        }
        self.columns = columns;
        let layout = select_layout(self.width_units());
        if layout == self.layout {
            return None;
        }
        self.layout = layout;
        Some(layout)
    }

    pub fn layout(&self) -> TableLayout {
        self.layout
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn width_units(&self) -> u32 {
        u32::from(self.columns) * self.units_per_cell
    }

    /// Table width in terminal cells for the current layout.
    pub fn table_cells(&self) -> u16 {
        match self.layout {
            TableLayout::Natural => self.columns,
            TableLayout::Constrained { virtual_width } => {
                u16::try_from(virtual_width.div_ceil(self.units_per_cell)).unwrap_or(u16::MAX)
            }
        }
    }

    /// Largest useful horizontal scroll offset, in cells.
    pub fn max_scroll(&self) -> u16 {
        self.table_cells().saturating_sub(self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_boundary() {
        assert_eq!(
            select_layout(699),
            TableLayout::Constrained {
                virtual_width: VIRTUAL_TABLE_WIDTH
            }
        );
        assert_eq!(select_layout(700), TableLayout::Natural);
        assert!(select_layout(0).is_constrained());
        assert_eq!(select_layout(4000), TableLayout::Natural);
    }

    #[test]
    fn viewport_scales_cells() {
        assert!(Viewport::new(8, 80).layout().is_constrained());
        assert_eq!(Viewport::new(8, 88).layout(), TableLayout::Natural);
    }

    #[test]
    fn observe_reports_only_layout_changes() {
        let mut vp = Viewport::new(8, 100);
        assert_eq!(vp.observe(100), None);
        assert_eq!(vp.observe(95), None);
        assert_eq!(
            vp.observe(60),
            Some(TableLayout::Constrained {
                virtual_width: VIRTUAL_TABLE_WIDTH
            })
        );
        assert_eq!(vp.observe(120), Some(TableLayout::Natural));
    }

    #[test]
    fn constrained_table_is_wider_than_viewport() {
        let vp = Viewport::new(8, 60);
        assert_eq!(vp.table_cells(), 125);
        assert_eq!(vp.max_scroll(), 65);
        assert_eq!(Viewport::new(8, 100).max_scroll(), 0);
    }
}
