use perpus_core::db::open_db_in_memory;
use perpus_core::{
    Book, BookRepository, Member, MemberRepository, RepoError, Repository, Return,
    ReturnRepository,
};

#[test]
fn alice_is_assigned_id_one_then_deleted() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberRepository::try_new(&conn).unwrap();

    let saved = members.save(Member::new("Alice")).unwrap();
    assert_eq!(saved.id, Some(1));
    assert_eq!(
        members.find_by_id(1).unwrap(),
        Some(Member::with_id(1, "Alice"))
    );

    members.delete_by_id(1).unwrap();
    assert!(members.find_by_id(1).unwrap().is_none());
    assert!(!members.exists_by_id(1).unwrap());
    assert_eq!(members.count().unwrap(), 0);
}

#[test]
fn saved_records_read_back_equal_except_for_id() {
    let conn = open_db_in_memory().unwrap();
    let books = BookRepository::try_new(&conn).unwrap();
    let returns = ReturnRepository::try_new(&conn).unwrap();

    let book = Book::new("Laskar Pelangi");
    let saved_book = books.save(book.clone()).unwrap();
    let loaded_book = books.find_by_id(saved_book.id.unwrap()).unwrap().unwrap();
    assert_eq!(Book { id: None, ..loaded_book }, book);

    let record = Return::new(3, 9);
    let saved_return = returns.save(record).unwrap();
    let loaded_return = returns
        .find_by_id(saved_return.id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(Return { id: None, ..loaded_return }, record);
}

#[test]
fn unknown_id_is_absent_not_an_error() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberRepository::try_new(&conn).unwrap();
    members.save(Member::new("Alice")).unwrap();

    assert!(members.find_by_id(404).unwrap().is_none());
    assert!(!members.exists_by_id(404).unwrap());

    let err = members.get_by_id(404).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "member",
            id: 404
        }
    ));
}

#[test]
fn delete_by_id_twice_leaves_same_state_as_once() {
    let conn = open_db_in_memory().unwrap();
    let books = BookRepository::try_new(&conn).unwrap();
    let kept = books.save(Book::new("Bumi Manusia")).unwrap();
    let removed = books.save(Book::new("Ronggeng Dukuh Paruk")).unwrap();
    let removed_id = removed.id.unwrap();

    books.delete_by_id(removed_id).unwrap();
    let after_once = books.find_all().unwrap();
    books.delete_by_id(removed_id).unwrap();
    let after_twice = books.find_all().unwrap();

    assert_eq!(after_once, after_twice);
    assert_eq!(after_twice, vec![kept]);
}

#[test]
fn count_matches_find_all_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberRepository::try_new(&conn).unwrap();
    for name in ["Alice", "Budi", "Citra"] {
        members.save(Member::new(name)).unwrap();
    }
    members.delete_by_id(2).unwrap();

    let all = members.find_all().unwrap();
    assert_eq!(members.count().unwrap(), all.len() as u64);
    let ids: Vec<_> = all.iter().map(|member| member.id.unwrap()).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn ids_are_not_reused_after_deletion() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberRepository::try_new(&conn).unwrap();

    members.save(Member::new("Alice")).unwrap();
    let second = members.save(Member::new("Budi")).unwrap();
    members.delete_by_id(second.id.unwrap()).unwrap();

    let third = members.save(Member::new("Citra")).unwrap();
    assert_eq!(third.id, Some(3));
}

#[test]
fn save_with_existing_id_overwrites_in_place() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberRepository::try_new(&conn).unwrap();

    let mut alice = members.save(Member::new("Alice")).unwrap();
    alice.name = "Alice Wijaya".to_string();
    let updated = members.save(alice.clone()).unwrap();

    assert_eq!(updated, alice);
    assert_eq!(members.count().unwrap(), 1);
    assert_eq!(members.get_by_id(1).unwrap().name, "Alice Wijaya");
}

#[test]
fn save_with_unknown_id_is_stored_under_a_fresh_id() {
    let conn = open_db_in_memory().unwrap();
    let books = BookRepository::try_new(&conn).unwrap();
    books.save(Book::new("Saman")).unwrap();

    let saved = books.save(Book::with_id(42, "Cantik Itu Luka")).unwrap();

    assert_eq!(saved, Book::with_id(2, "Cantik Itu Luka"));
    assert!(!books.exists_by_id(42).unwrap());
    assert_eq!(books.count().unwrap(), 2);
}

#[test]
fn saving_deleted_record_again_does_not_reuse_its_id() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberRepository::try_new(&conn).unwrap();

    let alice = members.save(Member::new("Alice")).unwrap();
    let deleted_id = alice.id.unwrap();
    members.delete_by_id(deleted_id).unwrap();

    let bob = members.save(Member::with_id(deleted_id, "Bob")).unwrap();

    assert_eq!(bob, Member::with_id(2, "Bob"));
    assert!(members.find_by_id(deleted_id).unwrap().is_none());
    assert_eq!(members.find_all().unwrap(), vec![bob]);
}

#[test]
fn blank_name_is_rejected_as_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberRepository::try_new(&conn).unwrap();

    let err = members.save(Member::new("   ")).unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert_eq!(members.count().unwrap(), 0);
}

#[test]
fn save_all_assigns_ids_in_order() {
    let conn = open_db_in_memory().unwrap();
    let returns = ReturnRepository::try_new(&conn).unwrap();

    let saved = returns
        .save_all(vec![Return::new(1, 10), Return::new(2, 20)])
        .unwrap();

    assert_eq!(saved, vec![Return::with_id(1, 1, 10), Return::with_id(2, 2, 20)]);
    assert_eq!(returns.find_all().unwrap(), saved);
}

#[test]
fn save_all_is_all_or_nothing() {
    let conn = open_db_in_memory().unwrap();
    let books = BookRepository::try_new(&conn).unwrap();
    books.save(Book::new("Bumi Manusia")).unwrap();

    let err = books
        .save_all(vec![Book::new("Saman"), Book::new(""), Book::new("Supernova")])
        .unwrap_err();

    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert_eq!(books.count().unwrap(), 1);
}

#[test]
fn find_all_by_id_skips_unknown_and_duplicate_ids() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberRepository::try_new(&conn).unwrap();
    for name in ["Alice", "Budi", "Citra"] {
        members.save(Member::new(name)).unwrap();
    }

    let found = members.find_all_by_id(&[3, 99, 1, 3]).unwrap();
    assert_eq!(
        found,
        vec![Member::with_id(1, "Alice"), Member::with_id(3, "Citra")]
    );
    assert!(members.find_all_by_id(&[]).unwrap().is_empty());
}

#[test]
fn delete_entity_ignores_unsaved_records() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberRepository::try_new(&conn).unwrap();
    let alice = members.save(Member::new("Alice")).unwrap();

    members.delete(&Member::new("Alice")).unwrap();
    assert_eq!(members.count().unwrap(), 1);

    members.delete(&alice).unwrap();
    assert_eq!(members.count().unwrap(), 0);
}

#[test]
fn delete_all_by_id_ignores_absent_ids() {
    let conn = open_db_in_memory().unwrap();
    let books = BookRepository::try_new(&conn).unwrap();
    for title in ["Bumi Manusia", "Saman", "Supernova"] {
        books.save(Book::new(title)).unwrap();
    }

    books.delete_all_by_id(&[1, 3, 77]).unwrap();

    assert_eq!(books.find_all().unwrap(), vec![Book::with_id(2, "Saman")]);
}

#[test]
fn delete_all_reports_removed_rows() {
    let conn = open_db_in_memory().unwrap();
    let returns = ReturnRepository::try_new(&conn).unwrap();
    returns
        .save_all(vec![Return::new(1, 1), Return::new(1, 2), Return::new(2, 1)])
        .unwrap();

    assert_eq!(returns.delete_all().unwrap(), 3);
    assert_eq!(returns.count().unwrap(), 0);
    assert_eq!(returns.delete_all().unwrap(), 0);
}

#[test]
fn identities_are_scoped_per_entity_type() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberRepository::try_new(&conn).unwrap();
    let books = BookRepository::try_new(&conn).unwrap();

    let member = members.save(Member::new("Alice")).unwrap();
    let book = books.save(Book::new("Saman")).unwrap();
    assert_eq!(member.id, Some(1));
    assert_eq!(book.id, Some(1));

    members.delete_by_id(1).unwrap();
    assert!(books.exists_by_id(1).unwrap());
}

#[test]
fn batch_operations_nest_inside_an_open_transaction() {
    let conn = open_db_in_memory().unwrap();
    let tx = conn.unchecked_transaction().unwrap();
    {
        let members = MemberRepository::try_new(&tx).unwrap();
        let saved = members
            .save_all(vec![Member::new("Alice"), Member::new("Budi")])
            .unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(members.find_all_by_id(&[1, 2]).unwrap(), saved);

        let err = members
            .save_all(vec![Member::new("Citra"), Member::new("")])
            .unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
        assert_eq!(members.count().unwrap(), 2);

        members.delete_all_by_id(&[1]).unwrap();
        assert_eq!(members.find_all().unwrap(), vec![Member::with_id(2, "Budi")]);
    }
    tx.rollback().unwrap();

    let members = MemberRepository::try_new(&conn).unwrap();
    assert_eq!(members.count().unwrap(), 0);
}
