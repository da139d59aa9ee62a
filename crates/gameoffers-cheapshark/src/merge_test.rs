use super::*;
use crate::types::GameInfo;

fn candidate(store: &str, deal: &str, price: Option<f64>, sale: Option<f64>) -> GameDeal {
    GameDeal {
        store_id: Some(store.to_string()),
        deal_id: Some(deal.to_string()),
        price,
        sale_price: sale,
        retail_price: Some(20.0),
    }
}

fn deal_with_info(info: DealGameInfo) -> DealLookup {
    DealLookup {
        game_info: Some(info),
        ..DealLookup::default()
    }
}

// ---------------------------------------------------------------------------
// pick_lowest_candidate
// ---------------------------------------------------------------------------

#[test]
fn pick_lowest_candidate_empty_is_none() {
    assert!(pick_lowest_candidate(&[]).is_none());
}

#[test]
fn pick_lowest_candidate_ignores_unpriced_entries() {
    let deals = vec![
        candidate("1", "a", None, None),
        candidate("2", "b", None, None),
        candidate("3", "c", Some(12.0), None),
        candidate("4", "d", None, None),
    ];
    let best = pick_lowest_candidate(&deals).expect("one priced entry");
    assert_eq!(best.deal_id.as_deref(), Some("c"));
}

#[test]
fn pick_lowest_candidate_all_unpriced_is_none() {
    let deals = vec![candidate("1", "a", None, None)];
    assert!(pick_lowest_candidate(&deals).is_none());
}

#[test]
fn pick_lowest_candidate_falls_back_to_sale_price() {
    let deals = vec![
        candidate("1", "a", Some(9.0), None),
        candidate("2", "b", None, Some(4.0)),
    ];
    let best = pick_lowest_candidate(&deals).expect("lowest");
    assert_eq!(best.deal_id.as_deref(), Some("b"));
}

#[test]
fn pick_lowest_candidate_prefers_price_over_sale_price() {
    // `price` is present, so the lower `sale_price` on the same entry is ignored.
    let deals = vec![
        candidate("1", "a", Some(9.0), Some(1.0)),
        candidate("2", "b", Some(5.0), None),
    ];
    let best = pick_lowest_candidate(&deals).expect("lowest");
    assert_eq!(best.deal_id.as_deref(), Some("b"));
}

#[test]
fn pick_lowest_candidate_ties_keep_first_entry() {
    let deals = vec![
        candidate("1", "first", Some(5.0), None),
        candidate("2", "second", Some(5.0), None),
        candidate("3", "pricier", Some(6.0), None),
    ];
    let best = pick_lowest_candidate(&deals).expect("lowest");
    assert_eq!(best.deal_id.as_deref(), Some("first"));
}

#[test]
fn pick_lowest_candidate_accepts_zero_price() {
    let deals = vec![
        candidate("1", "a", Some(3.0), None),
        candidate("2", "free", Some(0.0), None),
    ];
    let best = pick_lowest_candidate(&deals).expect("lowest");
    assert_eq!(best.deal_id.as_deref(), Some("free"));
}

// ---------------------------------------------------------------------------
// field merges
// ---------------------------------------------------------------------------

#[test]
fn merge_store_id_embedded_wins_over_candidate() {
    let deal = deal_with_info(DealGameInfo {
        store_id: Some("1".to_string()),
        ..DealGameInfo::default()
    });
    let cand = candidate("25", "x", Some(1.0), None);
    assert_eq!(
        merge_store_id(Some(&deal), Some(&cand)).as_deref(),
        Some("1")
    );
}

#[test]
fn merge_store_id_ignores_top_level_deal_store() {
    let deal = DealLookup {
        store_id: Some("99".to_string()),
        ..DealLookup::default()
    };
    let cand = candidate("25", "x", Some(1.0), None);
    assert_eq!(
        merge_store_id(Some(&deal), Some(&cand)).as_deref(),
        Some("25")
    );
    assert_eq!(merge_store_id(None, None), None);
}

#[test]
fn merge_sale_price_follows_precedence_chain() {
    let cand = candidate("1", "x", Some(7.0), Some(6.0));
    let own = DealLookup {
        sale_price: Some(8.0),
        ..DealLookup::default()
    };
    let embedded = DealLookup {
        sale_price: Some(8.0),
        game_info: Some(DealGameInfo {
            sale_price: Some(9.0),
            ..DealGameInfo::default()
        }),
        ..DealLookup::default()
    };
    let price_less = candidate("1", "x", None, Some(6.0));

    assert_eq!(merge_sale_price(Some(&embedded), Some(&cand)), Some(9.0));
    assert_eq!(merge_sale_price(Some(&own), Some(&cand)), Some(8.0));
    assert_eq!(merge_sale_price(None, Some(&cand)), Some(7.0));
    assert_eq!(merge_sale_price(None, Some(&price_less)), Some(6.0));
    assert_eq!(merge_sale_price(None, None), None);
}

#[test]
fn merge_retail_price_follows_precedence_chain() {
    let cand = candidate("1", "x", Some(7.0), None);
    let own = DealLookup {
        retail_price: Some(30.0),
        ..DealLookup::default()
    };
    let embedded = deal_with_info(DealGameInfo {
        retail_price: Some(40.0),
        ..DealGameInfo::default()
    });

    assert_eq!(merge_retail_price(Some(&embedded), Some(&cand)), Some(40.0));
    assert_eq!(merge_retail_price(Some(&own), Some(&cand)), Some(30.0));
    assert_eq!(merge_retail_price(None, Some(&cand)), Some(20.0));
    assert_eq!(merge_retail_price(None, None), None);
}

#[test]
fn merge_savings_embedded_wins_over_computed() {
    let deal = deal_with_info(DealGameInfo {
        savings: Some(33.0),
        ..DealGameInfo::default()
    });
    assert_eq!(merge_savings(Some(&deal), Some(10.0), Some(20.0)), Some(33));
}

#[test]
fn merge_savings_rounds_embedded_value() {
    let deal = deal_with_info(DealGameInfo {
        savings: Some(74.987_494),
        ..DealGameInfo::default()
    });
    assert_eq!(merge_savings(Some(&deal), None, None), Some(75));
}

#[test]
fn merge_savings_computes_when_not_embedded() {
    assert_eq!(merge_savings(None, Some(10.0), Some(20.0)), Some(50));
    assert_eq!(merge_savings(None, Some(10.0), Some(0.0)), None);
    assert_eq!(merge_savings(None, None, Some(20.0)), None);
}

#[test]
fn merge_deal_id_falls_back_to_primary_record() {
    let game = GameSummary {
        cheapest_deal_id: Some("primary".to_string()),
        ..GameSummary::default()
    };
    let deal = DealLookup {
        deal_id: Some("own".to_string()),
        ..DealLookup::default()
    };
    let cand = candidate("1", "cand", Some(1.0), None);

    assert_eq!(
        merge_deal_id(Some(&deal), Some(&cand), &game).as_deref(),
        Some("own")
    );
    assert_eq!(
        merge_deal_id(None, Some(&cand), &game).as_deref(),
        Some("cand")
    );
    assert_eq!(merge_deal_id(None, None, &game).as_deref(), Some("primary"));
    assert_eq!(merge_deal_id(None, None, &GameSummary::default()), None);
}

#[test]
fn merge_title_follows_precedence_chain() {
    let lookup = GameLookup {
        info: Some(GameInfo {
            title: Some("Lookup Title".to_string()),
            ..GameInfo::default()
        }),
        ..GameLookup::default()
    };
    let deal = deal_with_info(DealGameInfo {
        name: Some("Deal Name".to_string()),
        ..DealGameInfo::default()
    });
    let titled = GameSummary {
        external: Some("External".to_string()),
        ..GameSummary::default()
    };
    let untitled = GameSummary::default();

    assert_eq!(merge_title(&titled, Some(&lookup), Some(&deal)), "External");
    assert_eq!(
        merge_title(&untitled, Some(&lookup), Some(&deal)),
        "Lookup Title"
    );
    assert_eq!(merge_title(&untitled, None, Some(&deal)), "Deal Name");
    assert_eq!(merge_title(&untitled, None, None), "");
}

#[test]
fn deal_link_escapes_like_encode_uri_component() {
    assert_eq!(
        deal_link("tyTH88J0PXRvYALBjV3cNHd5Juq1qKcu4tG4lBiUCt4%3D"),
        "https://www.cheapshark.com/redirect?dealID=tyTH88J0PXRvYALBjV3cNHd5Juq1qKcu4tG4lBiUCt4%253D"
    );
    assert_eq!(
        deal_link("a b/c+d(e)"),
        "https://www.cheapshark.com/redirect?dealID=a%20b%2Fc%2Bd(e)"
    );
}
