//! The print driver: pagination plus per-page rendering with host
//! header/footer callbacks.
//!
//! `page_count` and `print` share one algorithm: lay the document out at
//! the page width, carve it with the pagination query, then (for `print`)
//! drive the painter once per page with a vertical translation and a clip
//! carved out for the header/footer bands. If the configured header and
//! footer together meet or exceed the physical page height, both are
//! disabled with a warning and printing continues without them.

use vellum_common::warning::warn_once;
use vellum_layout::metrics::FontMetrics;
use vellum_layout::paint::print::PrintPainter;
use vellum_layout::paint::Painter;
use vellum_layout::pagination::{DEFAULT_MIN_FILL, paginate};
use vellum_layout::tree::Rect;

use crate::engine::Engine;

/// A host callback drawing one page's header or footer: painter, page
/// number (1-based), and the band rectangle in engine pixels.
pub type PageChrome<'a> = dyn FnMut(&mut dyn Painter, usize, Rect) + 'a;

/// Clamp header/footer heights against the page height; disabling both
/// (with a warning) when they leave no room for content.
fn validated_chrome(page_height: f32, header_height: f32, footer_height: f32) -> (f32, f32) {
    let header_height = header_height.max(0.0);
    let footer_height = footer_height.max(0.0);
    if header_height + footer_height >= page_height {
        warn_once(
            "Print",
            "header and footer heights meet or exceed the page height; printing without them",
        );
        (0.0, 0.0)
    } else {
        (header_height, footer_height)
    }
}

impl Engine {
    /// Number of pages the document needs on the given painter's page
    /// geometry, with the given header/footer bands. Reflows the document
    /// at the page width.
    pub fn page_count(
        &mut self,
        painter: &dyn Painter,
        header_height: f32,
        footer_height: f32,
    ) -> usize {
        let Some((page_width, page_height)) = painter.page_extents() else {
            warn_once("Print", "page_count called with a non-paged painter");
            return 1;
        };
        let (header_height, footer_height) =
            validated_chrome(page_height, header_height, footer_height);
        let body_height = page_height - header_height - footer_height;

        vellum_layout::layout(&mut self.tree, self.root, page_width, self.metrics.as_ref());
        paginate(&self.tree, self.root, body_height, DEFAULT_MIN_FILL).len()
    }

    /// Render every page through the print painter, invoking the host's
    /// header/footer callbacks once per page. Returns the page count.
    pub fn print<M: FontMetrics>(
        &mut self,
        painter: &mut PrintPainter<M>,
        header_height: f32,
        footer_height: f32,
        mut header: Option<&mut PageChrome<'_>>,
        mut footer: Option<&mut PageChrome<'_>>,
    ) -> usize {
        let Some((page_width, page_height)) = painter.page_extents() else {
            return 0;
        };
        let (header_height, footer_height) =
            validated_chrome(page_height, header_height, footer_height);
        let chrome_disabled = header_height <= 0.0 && footer_height <= 0.0;
        let body_height = page_height - header_height - footer_height;

        vellum_layout::layout(&mut self.tree, self.root, page_width, self.metrics.as_ref());
        let pages = paginate(&self.tree, self.root, body_height, DEFAULT_MIN_FILL);

        for (index, page) in pages.iter().enumerate() {
            let page_number = index + 1;
            painter.start_page();

            if !chrome_disabled {
                if let Some(header) = header.as_deref_mut() {
                    header(
                        painter,
                        page_number,
                        Rect::new(0.0, 0.0, page_width, header_height),
                    );
                }
            }

            // The body band: translated so this page's slice lands below
            // the header, and clipped so neighbor pages never bleed in.
            let body = Rect::new(0.0, header_height, page_width, body_height);
            painter.set_clip(Some(body));
            vellum_layout::draw(
                &self.tree,
                self.root,
                painter,
                &body,
                0.0,
                header_height - page.start,
            );
            painter.set_clip(None);

            if !chrome_disabled {
                if let Some(footer) = footer.as_deref_mut() {
                    footer(
                        painter,
                        page_number,
                        Rect::new(0.0, header_height + body_height, page_width, footer_height),
                    );
                }
            }
        }
        pages.len()
    }
}
