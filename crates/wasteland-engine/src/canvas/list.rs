use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::text::FontId;

use super::{DrawCmd, RectCmd, TextCmd};

/// Paint layer. Higher layers are painted on top.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Layer(pub u8);

impl Layer {
    pub const BACKGROUND: Layer = Layer(0);
    pub const CONTENT: Layer = Layer(1);
    pub const TEXT: Layer = Layer(2);
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub layer: Layer,
    pub cmd: DrawCmd,
}

/// Recorded canvas commands for one frame.
///
/// Capacity is kept across `clear()` so a warmed-up list does not allocate.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    sorted: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.sorted.clear();
        self.sorted_dirty = false;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn push(&mut self, layer: Layer, cmd: DrawCmd) {
        self.items.push(DrawItem { layer, cmd });
        self.sorted_dirty = true;
    }

    pub fn push_rect(&mut self, layer: Layer, rect: Rect, color: Color) {
        self.push(layer, DrawCmd::Rect(RectCmd { rect, color }));
    }

    pub fn push_text(
        &mut self,
        layer: Layer,
        text: impl Into<String>,
        font: FontId,
        size: f32,
        color: Color,
        origin: Vec2,
    ) {
        self.push(layer, DrawCmd::Text(TextCmd {
            text: text.into(),
            font,
            size,
            color,
            origin,
            max_width: None,
        }));
    }

    /// Iterates items back-to-front. Equal layers keep insertion order.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.sorted.clear();
            self.sorted.extend(0..self.items.len());
            // `sort_by_key` is stable, which preserves insertion order per layer.
            let items = &self.items;
            self.sorted.sort_by_key(|&i| items[i].layer);
            self.sorted_dirty = false;
        }
        self.sorted.iter().map(|&i| &self.items[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_at(x: f32) -> Rect {
        Rect::new(x, 0.0, 1.0, 1.0)
    }

    fn xs(list: &mut DrawList) -> Vec<f32> {
        list.iter_in_paint_order()
            .map(|item| match &item.cmd {
                DrawCmd::Rect(r) => r.rect.origin.x,
                DrawCmd::Text(t) => t.origin.x,
            })
            .collect()
    }

    #[test]
    fn higher_layers_paint_last() {
        let mut list = DrawList::new();
        list.push_rect(Layer::TEXT, rect_at(0.0), Color::WHITE);
        list.push_rect(Layer::BACKGROUND, rect_at(1.0), Color::WHITE);
        list.push_rect(Layer::CONTENT, rect_at(2.0), Color::WHITE);
        assert_eq!(xs(&mut list), vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn same_layer_keeps_insertion_order() {
        let mut list = DrawList::new();
        for x in [3.0, 1.0, 2.0] {
            list.push_rect(Layer::CONTENT, rect_at(x), Color::WHITE);
        }
        assert_eq!(xs(&mut list), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn clear_empties_the_stream() {
        let mut list = DrawList::new();
        list.push_rect(Layer::CONTENT, rect_at(0.0), Color::WHITE);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.iter_in_paint_order().count(), 0);
    }
}
