use tiny_rope::{Arena, Node, Rope, RopeError};

/// Concatenate leaves one after another onto a growing left spine
fn build<'a>(arena: &'a Arena<'a>, parts: &[&'a str]) -> Rope<'a> {
    let mut rope = Rope::new(arena, parts[0]).unwrap();
    for &part in &parts[1..] {
        let leaf = Rope::new(arena, part).unwrap();
        rope = rope.concat(&leaf).unwrap();
    }
    rope
}

/// Every internal node's weight equals the length of its left subtree
fn weights_hold(rope: &Rope<'_>) -> bool {
    rope.check_weights()
}

#[test]
fn test_name_scenario() {
    let arena = Arena::new(64).unwrap();
    let rope = build(&arena, &["hello_", "my_", "na", "me_i", "s", "_simon"]);
    assert_eq!(rope.render(), "hello_my_name_is_simon");

    let edited = rope.insert_borrowed(3, "anus").unwrap();
    assert_eq!(edited.render(), "helanuslo_my_name_is_simon");
    assert!(weights_hold(&edited));

    // The earlier version is still intact
    assert_eq!(rope.render(), "hello_my_name_is_simon");
}

#[test]
fn test_byte_at_every_index() {
    let arena = Arena::new(64).unwrap();
    let text = "hello_my_name_is_simon";
    let rope = build(&arena, &["hello_", "my_", "na", "me_i", "s", "_simon"]);

    for (i, expected) in text.bytes().enumerate() {
        assert_eq!(rope.byte_at(i).unwrap(), expected, "index {}", i);
    }
    assert!(matches!(
        rope.byte_at(text.len()),
        Err(RopeError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_split_concat_identity() {
    let arena = Arena::new(4096).unwrap();
    let text = "hello_my_name_is_simon";
    let rope = build(&arena, &["hello_", "my_", "na", "me_i", "s", "_simon"]);

    for k in 0..=text.len() {
        let (left, right) = rope.split(k).unwrap();
        let joined = match (left, right) {
            (Some(l), Some(r)) => l.concat(&r).unwrap(),
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => Rope::empty(&arena).unwrap(),
        };
        assert_eq!(joined.render(), text, "split at {}", k);
        assert!(weights_hold(&joined));
    }
}

#[test]
fn test_delete_range_everywhere() {
    let arena = Arena::new(1 << 16).unwrap();
    let text = "hello_my_name_is_simon";
    let rope = build(&arena, &["hello_", "my_", "na", "me_i", "s", "_simon"]);

    for start in 0..=text.len() {
        for len in 0..=(text.len() - start) {
            let deleted = rope.delete(start, len).unwrap();
            let expected = format!("{}{}", &text[..start], &text[start + len..]);
            assert_eq!(deleted.render(), expected, "delete({}, {})", start, len);
            assert!(weights_hold(&deleted));
        }
    }

    assert!(rope.delete(20, 3).is_err());
}

#[test]
fn test_iterators_match_render() {
    let arena = Arena::new(64).unwrap();
    let single = Rope::new(&arena, "one leaf only").unwrap();
    let many = build(&arena, &["hello_", "my_", "na", "me_i", "s", "_simon"]);

    for rope in [single, many] {
        let rendered = rope.render();
        assert_eq!(rope.bytes().collect::<Vec<_>>(), rendered.as_bytes());
        assert_eq!(rope.chars().collect::<String>(), rendered);
        assert_eq!(rope.chunks().collect::<String>(), rendered);
    }
}

#[test]
fn test_arena_capacity_exact_fit() {
    // Six leaves joined by five internal nodes
    let arena = Arena::new(11).unwrap();
    let rope = build(&arena, &["hello_", "my_", "na", "me_i", "s", "_simon"]);
    assert_eq!(arena.used(), 11);
    assert_eq!(rope.node_count(), 11);

    let err = rope.insert(0, "x").unwrap_err();
    assert!(matches!(err, RopeError::ArenaExhausted { capacity: 11 }));
}

#[test]
fn test_versions_share_structure() {
    let arena = Arena::new(256).unwrap();
    let base = build(&arena, &["alpha ", "beta ", "gamma"]);

    let before = arena.used();
    let appended = base.insert(base.len(), " delta").unwrap();
    // Split rebuilds one join on the way up, then a leaf and a join for the insert
    assert_eq!(arena.used() - before, 3);
    assert_eq!(appended.render(), "alpha beta gamma delta");

    // Neither leaves nor untouched subtrees were copied
    let rebuilt = appended.root().left().unwrap();
    assert!(std::ptr::eq(rebuilt.left().unwrap(), base.root().left().unwrap()));
    assert!(std::ptr::eq(rebuilt.right().unwrap(), base.root().right().unwrap()));
}

#[test]
fn test_nested_arena_scope() {
    let outer = Arena::new(16).unwrap();
    let rope = Rope::new(&outer, "persistent").unwrap();

    {
        let scratch = outer.nested(8).unwrap();
        let temp = Rope::from_str(&scratch, "scratch copy of ").unwrap();
        let joined = temp.concat(&Rope::from_node(&scratch, rope.root())).unwrap();
        assert_eq!(joined.render(), "scratch copy of persistent");
        assert_eq!(scratch.used(), 2);
    }

    assert_eq!(outer.used(), 1);
    assert_eq!(rope.render(), "persistent");
}

#[test]
fn test_unbalanced_growth_is_kept() {
    let arena = Arena::new(1 << 16).unwrap();
    let mut rope = Rope::empty(&arena).unwrap();
    for i in 0..500 {
        rope = rope.insert(rope.len(), if i % 2 == 0 { "ab" } else { "c" }).unwrap();
    }

    assert_eq!(rope.len(), 750);
    assert!(rope.depth() > 100, "depth {}", rope.depth());
    assert!(weights_hold(&rope));
    assert_eq!(rope.bytes().count(), 750);
}

#[test]
fn test_empty_rope() {
    let arena = Arena::new(8).unwrap();
    let rope = Rope::empty(&arena).unwrap();

    assert!(rope.is_empty());
    assert_eq!(rope.render(), "");
    assert_eq!(rope.bytes().count(), 0);
    assert!(rope.byte_at(0).is_err());

    let (left, right) = rope.split(0).unwrap();
    assert!(left.unwrap().is_empty());
    assert!(right.is_none());

    let filled = rope.insert(0, "x").unwrap();
    assert_eq!(filled.render(), "x");
}

#[test]
fn test_node_level_api() {
    let arena = Arena::new(32).unwrap();
    let a = arena.alloc(Node::leaf("abc")).unwrap();
    let b = arena.alloc(Node::leaf("def")).unwrap();
    let root = a.concat(&arena, b).unwrap();

    assert!(root.is_internal());
    assert_eq!(root.weight(), 3);
    assert_eq!(root.len(), 6);

    let killed = root.kill(&arena, 2, 2).unwrap();
    assert_eq!(killed.render(), "abef");
    assert_eq!(root.render(), "abcdef");
}
