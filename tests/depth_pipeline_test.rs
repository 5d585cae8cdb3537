use bitget_p2p_depth::depth::{aggregate, aggregate_raw, bar_length, render_html, Report};
use bitget_p2p_depth::extractor::parse_cards;
use bitget_p2p_depth::market::{normalize, NormalizedListing, RawListing, Side};

fn raw(side: Side, price: &str, amount: &str) -> RawListing {
    RawListing::new(side, 1, price, amount)
}

#[test]
fn offer_side_scenario_end_to_end() {
    let listings = vec![
        raw(Side::Offer, "6.90", "100"),
        raw(Side::Offer, "6.90", "50"),
        raw(Side::Offer, "7.00", "200"),
    ];

    let book = aggregate_raw(Side::Offer, &listings);
    assert_eq!(book.total_volume, 350.0);
    assert_eq!(book.groups.len(), 2);
    assert_eq!(
        (book.groups[0].price, book.groups[0].total_volume, book.groups[0].listing_count),
        (6.90, 150.0, 2)
    );
    assert_eq!(
        (book.groups[1].price, book.groups[1].total_volume, book.groups[1].listing_count),
        (7.00, 200.0, 1)
    );

    let html = render_html(&Report::build(&book, 30, None), "USDT");
    assert!(html.contains("<strong>350 USDT</strong>"));
    assert!(html.find("6.90").unwrap() < html.find("7.00").unwrap());
}

#[test]
fn all_null_or_zero_amounts_give_an_empty_book() {
    let listings = vec![
        raw(Side::Demand, "6.90", "0"),
        raw(Side::Demand, "6.95", "N/A"),
        RawListing {
            raw_amount: None,
            ..raw(Side::Demand, "7.00", "")
        },
        raw(Side::Demand, "0.00", "100"),
    ];

    let book = aggregate_raw(Side::Demand, &listings);
    assert_eq!(book.total_volume, 0.0);
    assert!(!book.total_volume.is_sign_negative());
    assert!(book.groups.is_empty());
    assert_eq!(book.dropped, 4);

    let report = Report::build(&book, 30, None);
    assert!(report.rows.is_empty());
    assert!(render_html(&report, "USDT").contains("<strong>0 USDT</strong>"));
}

#[test]
fn filtered_records_never_touch_the_totals() {
    let clean = vec![
        raw(Side::Offer, "6.91", "120"),
        raw(Side::Offer, "6.93", "80"),
    ];
    let mut noisy = clean.clone();
    noisy.push(raw(Side::Offer, "6.91", "0"));
    noisy.push(raw(Side::Offer, "", "500"));
    noisy.push(raw(Side::Offer, "≈", "≈"));

    let clean_book = aggregate_raw(Side::Offer, &clean);
    let noisy_book = aggregate_raw(Side::Offer, &noisy);
    assert_eq!(clean_book.groups, noisy_book.groups);
    assert_eq!(clean_book.total_volume, noisy_book.total_volume);
}

#[test]
fn group_volumes_add_up_to_the_total() {
    let amounts = [12.5, 0.1, 0.2, 1_000.75, 33.3, 0.7, 250.0, 19.99];
    let prices = [6.9, 6.91, 6.9, 6.95, 6.91, 7.0, 6.9, 6.95];

    for side in Side::ALL {
        let listings = prices.iter().zip(amounts.iter()).map(|(&price, &amount)| {
            NormalizedListing {
                price,
                amount,
                side,
            }
        });
        let book = aggregate(side, listings);

        let summed: f64 = book.groups.iter().map(|g| g.total_volume).sum();
        assert_eq!(summed, book.total_volume);
        assert_eq!(book.listing_count(), prices.len());
    }
}

#[test]
fn sides_sort_strictly_in_opposite_directions() {
    let prices = ["6.93", "6.90", "7.01", "6.90", "6.97"];

    let offer: Vec<RawListing> = prices.iter().map(|p| raw(Side::Offer, p, "10")).collect();
    let demand: Vec<RawListing> = prices.iter().map(|p| raw(Side::Demand, p, "10")).collect();

    let offer_prices: Vec<f64> = aggregate_raw(Side::Offer, &offer)
        .groups
        .iter()
        .map(|g| g.price)
        .collect();
    let demand_prices: Vec<f64> = aggregate_raw(Side::Demand, &demand)
        .groups
        .iter()
        .map(|g| g.price)
        .collect();

    assert!(offer_prices.windows(2).all(|w| w[0] < w[1]));
    assert!(demand_prices.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(offer_prices.len(), 4);
}

#[test]
fn bars_are_bounded_by_the_scale() {
    let book = aggregate_raw(
        Side::Offer,
        &[
            raw(Side::Offer, "6.90", "1"),
            raw(Side::Offer, "6.95", "2"),
            raw(Side::Offer, "7.00", "997"),
        ],
    );

    for scale in [20, 30] {
        let report = Report::build(&book, scale, None);
        let total: u32 = report.rows.iter().map(|r| r.bar_length).sum();
        assert!(total <= scale);
        assert_eq!(report.rows[0].bar_length, 0);
        assert_eq!(report.rows[2].bar_length, scale - 1);
    }

    assert_eq!(bar_length(5.0, 0.0, 30), 0);
}

#[test]
fn normalizer_canonical_values() {
    assert_eq!(normalize("6.90 BOB"), Some(6.90));
    assert_eq!(normalize("1,234.56 USDT"), Some(1234.56));
    assert_eq!(normalize("≈ 1000"), Some(1000.0));
    assert_eq!(normalize(""), None);
    assert_eq!(normalize("N/A"), None);
}

#[test]
fn scraped_page_to_book() {
    let page = r#"
        <div class="hall-list-item">
          <span class="list-item__nickname">alpha</span>
          <span class="price-shower">6.96 BOB</span>
          <div class="list_limit"><span><span>2,000.00 USDT</span><span>100 - 5,000 BOB</span></span></div>
        </div>
        <div class="hall-list-item">
          <span class="list-item__nickname">beta</span>
          <span class="price-shower">6.96 BOB</span>
          <div class="list_limit"><span><span>500.00 USDT</span><span>100 - 500 BOB</span></span></div>
        </div>
        <div class="hall-list-item">
          <span class="list-item__nickname">gamma</span>
          <span class="price-shower">--</span>
          <div class="list_limit"><span><span>900 USDT</span></span></div>
        </div>
    "#;

    let listings = parse_cards(page, Side::Demand, 1);
    assert_eq!(listings.len(), 3);

    let book = aggregate_raw(Side::Demand, &listings);
    assert_eq!(book.groups.len(), 1);
    assert_eq!(book.groups[0].price, 6.96);
    assert_eq!(book.groups[0].listing_count, 2);
    assert_eq!(book.total_volume, 2_500.0);
    assert_eq!(book.dropped, 1);
}
