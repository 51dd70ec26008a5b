use causal_tree_core::{CausalTree, Id};
use causal_tree_test_support::text;

#[test]
fn concurrent_appends_at_same_position_converge() {
    // Create a tree and append "Hi " to it.
    let mut tree1 = CausalTree::new(0);
    tree1.add_sequence(None, "Hi ".chars()).unwrap();

    // Create another tree and merge.
    let mut tree2 = CausalTree::new(1);
    tree2.merge(&tree1).unwrap();

    // Both go offline; this is the last shared write.
    let shared = tree1.id();

    tree1.add_sequence(Some(tree1.id()), "World".chars()).unwrap();
    tree2.add_sequence(Some(shared), "Coders".chars()).unwrap();

    assert_eq!(text(&tree1), "Hi World");
    assert_eq!(text(&tree2), "Hi Coders");

    tree1.merge(&tree2).unwrap();
    tree2.merge(&tree1).unwrap();

    // Both branches start at timestamp 5; entity 1 wins the tie and sorts first.
    assert_eq!(text(&tree1), "Hi CodersWorld");
    assert_eq!(text(&tree2), "Hi CodersWorld");
    assert_eq!(tree1.ordered_nodes(true), tree2.ordered_nodes(true));
}

#[test]
fn interleaved_inserts_around_shared_node() {
    let mut tree1 = CausalTree::new(0);
    let mut tree2 = CausalTree::new(1);

    tree1.add_sequence(None, "Hello!".chars()).unwrap();
    tree2.merge(&tree1).unwrap();

    assert_eq!(text(&tree1), "Hello!");
    assert_eq!(text(&tree2), "Hello!");

    let bang = tree1.id();
    let o = Id::new(bang.timestamp - 1, bang.entity_id);

    // The first tree adds " World" before '!'.
    tree1.add_sequence(Some(o), " World".chars()).unwrap();

    // The second tree adds ":-)" after '!'.
    tree2.add_sequence(Some(bang), ":-)".chars()).unwrap();

    assert_eq!(text(&tree1), "Hello World!");
    assert_eq!(text(&tree2), "Hello!:-)");

    tree1.merge(&tree2).unwrap();
    tree2.merge(&tree1).unwrap();

    assert_eq!(text(&tree1), "Hello World!:-)");
    assert_eq!(text(&tree2), "Hello World!:-)");
}

#[test]
fn disjoint_trees_merge_both_ways() {
    let mut t1 = CausalTree::new(0);
    t1.add_sequence(None, "hi there".chars()).unwrap();

    let mut t2 = CausalTree::new(1);
    t2.add_sequence(None, "bye there".chars()).unwrap();

    t1.merge(&t2).unwrap();
    t2.merge(&t1).unwrap();

    // Both roots' first nodes carry timestamp 2; entity 1 sorts first.
    assert_eq!(text(&t1), "bye therehi there");
    assert_eq!(text(&t1), text(&t2));
}

#[test]
fn disjoint_trees_merge_with_deletes() {
    let mut t1 = CausalTree::new(0);
    t1.add_sequence(None, "hi there".chars()).unwrap();

    let mut t2 = CausalTree::new(1);
    t2.add_sequence(None, "bye there".chars()).unwrap();

    // Remove the final 'e'.
    t2.remove_node(Id::new(10, t2.entity_id()));

    t1.merge(&t2).unwrap();
    t2.merge(&t1).unwrap();

    assert_eq!(text(&t1), text(&t2));
    assert_eq!(text(&t1), "bye therhi there");
}

#[test]
fn concurrent_removal_and_append_after_same_node() {
    let mut a = CausalTree::new(0);
    let last = a.add_sequence(None, "cat".chars()).unwrap().unwrap();
    let mut b = CausalTree::new(1);
    b.merge(&a).unwrap();

    a.remove_node(last);
    b.add_sequence(Some(last), "s".chars()).unwrap();

    a.merge(&b).unwrap();
    b.merge(&a).unwrap();

    assert_eq!(text(&a), "cas");
    assert_eq!(text(&b), "cas");
}

#[test]
fn both_replicas_remove_same_node() {
    let mut a = CausalTree::new(0);
    let y = a.add_sequence(None, "xy".chars()).unwrap().unwrap();
    let mut b = CausalTree::new(1);
    b.merge(&a).unwrap();

    a.remove_node(y);
    b.remove_node(y);

    assert_eq!(a.merge(&b).unwrap().tombstoned, 0);
    assert_eq!(b.merge(&a).unwrap().tombstoned, 0);
    assert_eq!(text(&a), "x");
    assert_eq!(a.ordered_nodes(true), b.ordered_nodes(true));
}
