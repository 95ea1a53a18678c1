use serde::{Deserialize, Serialize};

/// Screen corner a control panel is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Position {
    pub fn is_top(&self) -> bool {
        matches!(self, Position::TopLeft | Position::TopRight)
    }

    pub fn is_left(&self) -> bool {
        matches!(self, Position::TopLeft | Position::BottomLeft)
    }
}

#[cfg(feature = "egui")]
impl Position {
    /// Rect of `size` placed in this corner of `container`, `margin` pixels in
    pub fn calculate_rect(&self, container: egui::Rect, size: egui::Vec2, margin: f32) -> egui::Rect {
        let x = if self.is_left() {
            container.min.x + margin
        } else {
            container.max.x - margin - size.x
        };
        let y = if self.is_top() {
            container.min.y + margin
        } else {
            container.max.y - margin - size.y
        };
        egui::Rect::from_min_size(egui::Pos2::new(x, y), size)
    }

    pub fn align(&self) -> egui::Align2 {
        match self {
            Position::TopLeft => egui::Align2::LEFT_TOP,
            Position::TopRight => egui::Align2::RIGHT_TOP,
            Position::BottomLeft => egui::Align2::LEFT_BOTTOM,
            Position::BottomRight => egui::Align2::RIGHT_BOTTOM,
        }
    }
}
