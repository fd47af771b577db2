//! Plain-text output of view models.

#![allow(clippy::print_stdout)]

use arcane_core::{MAX_STARS, TagBadge};
use arcane_storefront::views::{
    CartBody, CartOverlay, Gallery, ProductDetail, ReviewsSection, SizeSelector,
};

fn stars(count: u8) -> String {
    let full = usize::from(count.min(MAX_STARS));
    let empty = usize::from(MAX_STARS) - full;
    format!("{}{}", "★".repeat(full), "☆".repeat(empty))
}

fn badges(tags: &[TagBadge]) -> String {
    tags.iter()
        .map(|tag| format!("[{}]", tag.label))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn gallery(gallery: &Gallery) {
    match gallery {
        Gallery::Empty { message } => println!("{message}"),
        Gallery::Cards(cards) => {
            for card in cards {
                println!(
                    "{:<16} {:<28} {:>9}  {:<12} {}",
                    card.id.as_str(),
                    card.name,
                    card.price,
                    card.add_title,
                    badges(&card.tags)
                );
            }
        }
    }
}

fn size_choices(sizes: &SizeSelector) -> String {
    sizes
        .options()
        .iter()
        .map(|&size| {
            if sizes.selected().is_some_and(|selected| selected.as_str() == size) {
                format!("[{size}]")
            } else {
                size.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn detail(detail: &ProductDetail, sizes: &SizeSelector) {
    println!("{} ({})", detail.name, detail.id);
    if !detail.type_line.is_empty() {
        println!("{}", detail.type_line);
    }
    println!("{}", detail.price);
    if !detail.tags.is_empty() {
        println!("{}", badges(&detail.tags));
    }
    if !detail.description.is_empty() {
        println!();
        println!("{}", detail.description);
    }
    if !detail.fulfillment.is_empty() {
        println!("{}", detail.fulfillment);
    }
    println!();
    println!("Sizes: {}", size_choices(sizes));
    println!("{} | {}", detail.stock_label, detail.stock_info);
}

pub fn reviews(section: &ReviewsSection) {
    let summary = &section.summary;
    println!(
        "{} {} ({})",
        summary.average,
        stars(summary.stars),
        summary.count_label
    );
    if section.is_empty() {
        println!("No reviews yet.");
        return;
    }
    for card in &section.reviews {
        println!("  {}  {}", stars(card.stars), card.date);
        if !card.comment.is_empty() {
            println!("    {}", card.comment);
        }
    }
}

pub fn cart(overlay: &CartOverlay) {
    match &overlay.body {
        CartBody::Empty { message } => println!("{message}"),
        CartBody::Lines(lines) => {
            for line in lines {
                println!(
                    "{:<16} {:<28} {:<3} {:>9} x{:<3} {:>10}",
                    line.id.as_str(),
                    line.name,
                    line.size.as_str(),
                    line.price,
                    line.quantity,
                    line.line_total
                );
            }
        }
    }
    println!("Total: {}", overlay.total);
}

pub fn message(text: &str) {
    println!("{text}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars() {
        assert_eq!(stars(0), "☆☆☆☆☆");
        assert_eq!(stars(4), "★★★★☆");
        assert_eq!(stars(9), "★★★★★");
    }

    #[test]
    fn test_size_choices_mark_selection() {
        let mut sizes = SizeSelector::default();
        assert_eq!(size_choices(&sizes), "S M L XL");

        sizes.select("L").unwrap_or_default();
        assert_eq!(size_choices(&sizes), "S M [L] XL");
    }
}
