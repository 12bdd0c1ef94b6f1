//! Layout guarantees checked through the public API.

use trellis::config::ScreenConfig;
use trellis::containers::{Grid, Panel, ScrollContainer, StackPanel, TrackDefinition};
use trellis::control::{HorizontalAlignment, Orientation, VerticalAlignment};
use trellis::geometry::{Border, Size};
use trellis::{ControlId, TreeOptions, UiTree};

fn top_left(tree: &mut UiTree, id: ControlId) {
    tree.get_mut(id)
        .unwrap()
        .set_horizontal_alignment(HorizontalAlignment::Left)
        .set_vertical_alignment(VerticalAlignment::Top);
}

#[test]
fn arranged_size_stays_within_bounds() {
    for (viewport_width, expected_width) in [(5, 14), (20, 20), (50, 34)] {
        let mut tree = UiTree::new(Size::new(viewport_width, 20));
        let root = tree.root();
        let panel = tree.create_child(root, Panel).unwrap();
        tree.get_mut(panel)
            .unwrap()
            .set_min_width(Some(10))
            .set_max_width(Some(30))
            .set_margin(Border::all(1))
            .set_padding(Border::all(1))
            .set_horizontal_alignment(HorizontalAlignment::Stretch)
            .set_vertical_alignment(VerticalAlignment::Top);
        tree.perform_layout();

        let size = tree.get(panel).unwrap().actual_size();
        // Stretch fills the slot within [min, max] plus borders.
        assert_eq!(size.width, expected_width, "viewport {}", viewport_width);
        assert!((14..=34).contains(&size.width));
        // Top alignment keeps the content height.
        assert_eq!(size.height, 4);
    }
}

#[test]
fn equal_parts_columns_share_the_width() {
    for (width, columns) in [(100, 3), (47, 4), (9, 9), (5, 7)] {
        let mut tree = UiTree::new(Size::new(width, 10));
        let root = tree.root();
        let tracks = (0..columns).map(|_| TrackDefinition::parts(1)).collect();
        let grid = tree.create_child(root, Grid::new(tracks, Vec::new())).unwrap();
        tree.perform_layout();

        let sizes = Grid::track_sizes(&tree, grid, Orientation::Horizontal).unwrap();
        assert_eq!(sizes.len(), columns);
        assert!(sizes.iter().all(|size| *size == width / columns as i32));
        assert!(sizes.iter().sum::<i32>() <= width);
    }
}

#[test]
fn stack_panel_sums_children_and_spacing() {
    let mut tree = UiTree::new(Size::new(40, 40));
    let root = tree.root();
    let stack = tree
        .create_child(root, StackPanel::new(Orientation::Vertical).with_spacing(1))
        .unwrap();
    top_left(&mut tree, stack);
    tree.get_mut(stack).unwrap().set_padding(Border::all(1));
    for width in [3, 5, 2, 3, 1] {
        let child = tree.create_child(stack, Panel).unwrap();
        tree.get_mut(child).unwrap().set_size(width, 2);
    }
    tree.perform_layout();

    // 5 * 2 + 4 * 1, plus padding; the widest child sets the width.
    assert_eq!(tree.get(stack).unwrap().actual_size(), Size::new(7, 16));
}

#[test]
fn vertical_scroll_position_stays_in_range() {
    let options = TreeOptions::default().with_config(
        ScreenConfig::default()
            .with_scrollbar_thickness(1)
            .with_min_knob_size(1),
    );
    let mut tree = UiTree::with_options(Size::new(20, 10), options).unwrap();
    let root = tree.root();
    let container = ScrollContainer::create_child(&mut tree, root).unwrap();
    let content = tree.create(Panel).unwrap();
    tree.get_mut(content).unwrap().set_height(Some(30));
    ScrollContainer::set_content(&mut tree, container, content).unwrap();
    tree.perform_layout();

    let check = |tree: &UiTree| {
        let scroll = tree.behavior::<ScrollContainer>(container).unwrap();
        let max = (scroll.virtual_size().height - scroll.actual_client_size().height).max(0);
        let position = scroll.vertical_scroll_position();
        assert!((0..=max).contains(&position), "{} not in 0..={}", position, max);
    };

    for target in [-5, 0, 7, 20, 21, 1000] {
        ScrollContainer::scroll_to(&mut tree, container, None, Some(target)).unwrap();
        check(&tree);
    }
    for delta in [-100, 3, 50, -1] {
        ScrollContainer::scroll_by(&mut tree, container, 0, delta).unwrap();
        check(&tree);
    }

    tree.get_mut(content).unwrap().set_height(Some(4));
    tree.perform_layout();
    check(&tree);
}
