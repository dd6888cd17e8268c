//! The cards on the table: where they sit, how they are laid out for a
//! window size, and which one is being dragged.

use std::sync::{Arc, Mutex, PoisonError};

use stagehand::{
    error::{self, Result},
    geom::{Point, Size},
    screens::GameView,
    widgets::{HasMutableLocation, HasMutableSize, Sprite},
};
use tracing::debug;

use crate::textures::Textures;

/// Gap between the window edge and the cards, as a fraction of the width.
const BOUNDARY_FRACTION: f64 = 0.05;
/// Gap between cards, as a fraction of the card width.
const SPACING_FRACTION: f64 = 0.03;
/// Widest a card may be, as a fraction of the window width.
const MAX_CARD_WIDTH_FRACTION: f64 = 0.2;
/// Tallest a card may be, as a fraction of the window height.
const MAX_CARD_HEIGHT_FRACTION: f64 = 0.35;
/// Symbol width as a fraction of the card width.
const SYMBOL_WIDTH_FRACTION: f64 = 0.6;

/// A card's rectangle in window space: origin top-left, Y down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Place {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Place {
    /// Does the place contain window point `p`? Edges are inclusive.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.width
            && p.y >= self.top
            && p.y <= self.top + self.height
    }

    /// The centre.
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Lay out `count` cards in one centred row for a window of `size`.
pub fn row_layout(size: Size, count: usize, card_aspect: f64) -> Vec<Place> {
    if count == 0 || card_aspect <= 0.0 {
        return vec![];
    }
    let n = count as f64;
    let max_height = size.h * MAX_CARD_HEIGHT_FRACTION;
    let max_width = (card_aspect * max_height).min(size.w * MAX_CARD_WIDTH_FRACTION);
    let playing_width = size.w - 2.0 * size.w * BOUNDARY_FRACTION;
    let width = max_width.min(playing_width / (n + (n - 1.0) * SPACING_FRACTION));
    let height = width / card_aspect;
    let top = size.h / 2.0 - height / 2.0;
    let row_width = n * width + (n - 1.0) * width * SPACING_FRACTION;
    let first_left = size.w / 2.0 - row_width / 2.0;
    (0..count)
        .map(|i| Place {
            left: first_left + i as f64 * (1.0 + SPACING_FRACTION) * width,
            top,
            width,
            height,
        })
        .collect()
}

/// One card: a background sprite with a symbol sprite on top.
struct Card {
    /// Symbol name.
    face: &'static str,
    /// Background sprite.
    back: Sprite,
    /// Symbol sprite.
    symbol: Sprite,
    /// Width/height ratio of the symbol texture.
    symbol_aspect: f64,
    /// Current place.
    place: Place,
}

impl Card {
    /// Move the card and its symbol to `place`. The symbol is centred and
    /// keeps its aspect ratio.
    fn set_place(&mut self, place: Place) -> Result<()> {
        self.place = place;
        self.back.set_size(Size::new(place.width, place.height))?;
        self.back.set_location(place.left, place.top)?;
        let w = place.width * SYMBOL_WIDTH_FRACTION;
        let h = w / self.symbol_aspect;
        self.symbol.set_size(Size::new(w, h))?;
        self.symbol.set_location(
            place.left + place.width / 2.0 - w / 2.0,
            place.top + place.height / 2.0 - h / 2.0,
        )
    }
}

/// A drag in progress.
#[derive(Debug, Clone, Copy)]
struct Grab {
    /// Index of the dragged card.
    card: usize,
    /// Pointer position relative to the card's top-left corner.
    offset: Point,
}

/// Table state.
#[derive(Default)]
struct Board {
    /// Cards in creation order, so later cards draw on top.
    cards: Vec<Card>,
    /// Aspect ratio of the card background.
    card_aspect: f64,
    /// The current drag.
    grab: Option<Grab>,
}

/// Shared handle onto the cards of one game view.
#[derive(Clone, Default)]
pub struct Table {
    /// Table state.
    board: Arc<Mutex<Board>>,
}

impl Table {
    /// Deal `faces` onto `view`: one background and one symbol sprite per
    /// card. Unknown faces are a programmer error.
    pub fn deal(view: &GameView, textures: &Textures, faces: &[&'static str]) -> Result<Self> {
        let mut cards = Vec::with_capacity(faces.len());
        for face in faces {
            let Some(symbol_texture) = textures.symbol(face) else {
                error::precondition(format!("no symbol for card face {face}"));
            };
            let back = view.create_sprite()?;
            back.set_texture(textures.card().clone())?;
            let symbol = view.create_sprite()?;
            symbol.set_texture(symbol_texture.clone())?;
            cards.push(Card {
                face,
                back,
                symbol,
                symbol_aspect: symbol_texture.aspect_ratio(),
                place: Place::default(),
            });
        }
        debug!(cards = cards.len(), "dealt");
        Ok(Self {
            board: Arc::new(Mutex::new(Board {
                cards,
                card_aspect: textures.card().aspect_ratio(),
                grab: None,
            })),
        })
    }

    /// Run `f` with the board locked.
    fn with<R>(&self, f: impl FnOnce(&mut Board) -> R) -> R {
        let mut board = self.board.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut board)
    }

    /// Faces and places of every card, in deal order.
    pub fn cards(&self) -> Vec<(&'static str, Place)> {
        self.with(|b| b.cards.iter().map(|c| (c.face, c.place)).collect())
    }

    /// Is a card being dragged?
    pub fn is_dragging(&self) -> bool {
        self.with(|b| b.grab.is_some())
    }

    /// Lay the cards out in a row for a window of `width` x `height`. Any
    /// drag in progress is dropped.
    pub fn layout(&self, width: i64, height: i64) -> Result<()> {
        let size = Size::new(width as f64, height as f64);
        self.with(|b| {
            b.grab = None;
            let places = row_layout(size, b.cards.len(), b.card_aspect);
            for (card, place) in b.cards.iter_mut().zip(places) {
                card.set_place(place)?;
            }
            Ok(())
        })
    }

    /// Pick up the topmost card under window point `p`, if any.
    pub fn grab(&self, p: Point) -> bool {
        self.with(|b| {
            let hit = b.cards.iter().rposition(|c| c.place.contains(p));
            b.grab = hit.map(|i| Grab {
                card: i,
                offset: p - Point::new(b.cards[i].place.left, b.cards[i].place.top),
            });
            hit.is_some()
        })
    }

    /// Move the held card so the pointer keeps its grip at window point `p`.
    pub fn drag_to(&self, p: Point) -> Result<()> {
        self.with(|b| {
            let Some(g) = b.grab else {
                return Ok(());
            };
            let card = &mut b.cards[g.card];
            let place = Place {
                left: p.x - g.offset.x,
                top: p.y - g.offset.y,
                ..card.place
            };
            card.set_place(place)
        })
    }

    /// Let go of the held card.
    pub fn release(&self) {
        if let Some(g) = self.with(|b| b.grab.take()) {
            debug!(card = g.card, "card dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn row_is_centred_and_bounded() {
        let places = row_layout(Size::new(1000.0, 600.0), 4, 250.0 / 350.0);
        assert_eq!(places.len(), 4);
        // Height-bound: 0.35 * 600 = 210 tall.
        assert!(close(places[0].height, 210.0));
        assert!(close(places[0].width, 150.0));
        assert!(close(places[0].top, 195.0));
        let left = places[0].left;
        let right = places[3].left + places[3].width;
        assert!(close(left + right, 1000.0));
        assert!(places.windows(2).all(|w| w[0].left + w[0].width < w[1].left));
    }

    #[test]
    fn many_cards_shrink_to_fit() {
        let places = row_layout(Size::new(500.0, 600.0), 10, 1.0);
        let right = places[9].left + places[9].width;
        assert!(places[0].left >= 25.0 - 1e-9);
        assert!(right <= 475.0 + 1e-9);
        assert!(row_layout(Size::new(500.0, 600.0), 0, 1.0).is_empty());
    }

    #[test]
    fn place_contains_edges() {
        let p = Place {
            left: 10.0,
            top: 20.0,
            width: 30.0,
            height: 40.0,
        };
        assert!(p.contains(Point::new(10.0, 20.0)));
        assert!(p.contains(Point::new(40.0, 60.0)));
        assert!(!p.contains(Point::new(41.0, 60.0)));
        assert_eq!(p.center(), Point::new(25.0, 40.0));
    }
}
