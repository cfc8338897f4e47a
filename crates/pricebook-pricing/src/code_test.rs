use super::*;
use pricebook_core::PriceCodeEntry;
use pricebook_sheet::ingest_products;

fn book(code: &str, reference: &str) -> PriceCodeBook {
    [PriceCodeEntry::new(code, reference)].into_iter().collect()
}

fn dec(num: i64, scale: u32) -> Decimal {
    Decimal::new(num, scale)
}

// -----------------------------------------------------------------------
// classification
// -----------------------------------------------------------------------

#[test]
fn classify_percentage_forms() {
    assert_eq!(
        CodeReference::classify("10%"),
        CodeReference::Percentage {
            percent: dec(10, 0),
            literal: "10%".to_string()
        }
    );
    assert_eq!(
        CodeReference::classify(" 2,5% "),
        CodeReference::Percentage {
            percent: dec(25, 1),
            literal: "2,5%".to_string()
        }
    );
    assert!(matches!(
        CodeReference::classify("-5%"),
        CodeReference::Percentage { percent, .. } if percent == dec(-5, 0)
    ));
}

#[test]
fn classify_index_forms() {
    assert_eq!(CodeReference::classify("2"), CodeReference::Index(2));
    assert_eq!(CodeReference::classify("-1"), CodeReference::Index(-1));
}

#[test]
fn classify_everything_else_as_header_name() {
    assert_eq!(
        CodeReference::classify("VALOR ATACADO"),
        CodeReference::HeaderName("VALOR ATACADO".to_string())
    );
    assert_eq!(
        CodeReference::classify("10 %"),
        CodeReference::HeaderName("10 %".to_string())
    );
}

// -----------------------------------------------------------------------
// lookup
// -----------------------------------------------------------------------

#[test]
fn unknown_code_yields_no_overrides() {
    let catalog = ingest_products("SKU,MODELO,VALOR\nS1,M1,200");
    let overrides = resolve_code("NOPE", &catalog, &book("VIP", "10%"));
    assert!(overrides.is_empty());
}

#[test]
fn empty_book_yields_no_overrides() {
    let catalog = ingest_products("SKU,MODELO,VALOR\nS1,M1,200");
    let overrides = resolve_code("VIP", &catalog, &PriceCodeBook::default());
    assert!(overrides.is_empty());
}

#[test]
fn code_lookup_folds_case_and_accents() {
    let catalog = ingest_products("SKU,MODELO,VALOR\nS1,M1,200");
    let overrides = resolve_code("  Promoção ", &catalog, &book("PROMOCAO", "10%"));
    assert_eq!(overrides.get("product-1"), Some(dec(180, 0)));
}

// -----------------------------------------------------------------------
// percentage
// -----------------------------------------------------------------------

#[test]
fn percentage_applies_to_first_price_column() {
    let catalog = ingest_products("SKU,MODELO,VALOR,VALOR B\nS1,M1,200,999");
    let overrides = resolve_code("VIP", &catalog, &book("VIP", "10%"));
    assert_eq!(overrides.get("product-1"), Some(dec(180, 0)));
}

#[test]
fn percentage_prefers_column_named_after_it() {
    let catalog = ingest_products("SKU,MODELO,VALOR,VALOR 10%\nS1,M1,200,150");
    let overrides = resolve_code("VIP", &catalog, &book("VIP", "10%"));
    assert_eq!(overrides.get("product-1"), Some(dec(150, 0)));
}

#[test]
fn percentage_uses_base_price_when_cell_does_not_parse() {
    // Price column is blank; ingestion found the base price in another cell.
    let catalog = ingest_products("SKU,MODELO,VALOR,OBS\nS1,M1,,\"R$ 50,00\"");
    assert_eq!(catalog.products[0].base_price, dec(50, 0));
    let overrides = resolve_code("VIP", &catalog, &book("VIP", "10%"));
    assert_eq!(overrides.get("product-1"), Some(dec(45, 0)));
}

#[test]
fn percentage_result_is_clamped_at_zero() {
    let catalog = ingest_products("SKU,MODELO,VALOR\nS1,M1,200");
    let overrides = resolve_code("ALL", &catalog, &book("ALL", "150%"));
    assert_eq!(overrides.get("product-1"), Some(Decimal::ZERO));
}

#[test]
fn percentage_keeps_full_precision() {
    let catalog = ingest_products("SKU,MODELO,VALOR\nS1,M1,\"R$ 33,33\"");
    let overrides = resolve_code("VIP", &catalog, &book("VIP", "5%"));
    // 33.33 * 0.95, not rounded to cents
    assert_eq!(overrides.get("product-1"), Some(dec(316_635, 4)));
}

#[test]
fn percentage_overflow_skips_product_instead_of_panicking() {
    let catalog = ingest_products("SKU,MODELO,VALOR\nS1,M1,900000\nS2,M2,0");
    let overrides = resolve_code(
        "X",
        &catalog,
        &book("X", "-999999999999999999999999999%"),
    );
    assert_eq!(overrides.get("product-1"), None);
    assert_eq!(overrides.get("product-2"), Some(Decimal::ZERO));
    assert_eq!(overrides.unit_price(&catalog.products[0]), dec(900_000, 0));
}

#[test]
fn percentage_without_price_columns_yields_nothing() {
    let catalog = ingest_products("SKU,MODELO,OBS\nS1,M1,\"R$ 50,00\"");
    let overrides = resolve_code("VIP", &catalog, &book("VIP", "10%"));
    assert!(overrides.is_empty());
}

// -----------------------------------------------------------------------
// index
// -----------------------------------------------------------------------

const INDEXED: &str = "SKU,MODELO,VALOR A,COR,VALOR B,OBS,PREÇO C\nS1,M1,10,x,20,y,30";

#[test]
fn negative_index_counts_from_the_end() {
    let catalog = ingest_products(INDEXED);
    let overrides = resolve_code("LAST", &catalog, &book("LAST", "-1"));
    assert_eq!(overrides.get("product-1"), Some(dec(30, 0)));
    let overrides = resolve_code("FIRST", &catalog, &book("FIRST", "-3"));
    assert_eq!(overrides.get("product-1"), Some(dec(10, 0)));
}

#[test]
fn non_negative_index_counts_from_the_start() {
    let catalog = ingest_products(INDEXED);
    assert_eq!(
        resolve_code("A", &catalog, &book("A", "0")).get("product-1"),
        Some(dec(10, 0))
    );
    assert_eq!(
        resolve_code("B", &catalog, &book("B", "1")).get("product-1"),
        Some(dec(20, 0))
    );
}

#[test]
fn out_of_range_index_yields_nothing() {
    let catalog = ingest_products(INDEXED);
    assert!(resolve_code("X", &catalog, &book("X", "3")).is_empty());
    assert!(resolve_code("Y", &catalog, &book("Y", "-4")).is_empty());
}

#[test]
fn index_falls_back_to_base_price_for_bad_cell() {
    let catalog = ingest_products("SKU,MODELO,VALOR A,VALOR B\nS1,M1,10,consulte\nS2,M2,12,11");
    let overrides = resolve_code("B", &catalog, &book("B", "1"));
    assert_eq!(overrides.get("product-1"), Some(dec(10, 0)));
    assert_eq!(overrides.get("product-2"), Some(dec(11, 0)));
}

// -----------------------------------------------------------------------
// header name
// -----------------------------------------------------------------------

#[test]
fn header_name_prefers_exact_match() {
    let catalog = ingest_products("SKU,MODELO,VALOR,VALOR ATACADO,ATACADO\nS1,M1,10,9,8");
    let overrides = resolve_code("LOJA", &catalog, &book("LOJA", "atacado"));
    assert_eq!(overrides.get("product-1"), Some(dec(8, 0)));
}

#[test]
fn header_name_then_prefers_price_column() {
    let catalog = ingest_products("SKU,MODELO,OBS ATACADO,VALOR ATACADO\nS1,M1,nota,9");
    let overrides = resolve_code("LOJA", &catalog, &book("LOJA", "atacado"));
    assert_eq!(overrides.get("product-1"), Some(dec(9, 0)));
}

#[test]
fn header_name_then_any_containing_column() {
    let catalog = ingest_products("SKU,MODELO,VALOR,LISTA REVENDA\nS1,M1,10,7");
    let overrides = resolve_code("R", &catalog, &book("R", "revenda"));
    assert_eq!(overrides.get("product-1"), Some(dec(7, 0)));
}

#[test]
fn unresolved_header_name_yields_nothing() {
    let catalog = ingest_products("SKU,MODELO,VALOR\nS1,M1,10");
    assert!(resolve_code("R", &catalog, &book("R", "revenda")).is_empty());
}

// -----------------------------------------------------------------------
// overrides feed the effective price
// -----------------------------------------------------------------------

#[test]
fn unit_price_applies_promotion_minimum() {
    let catalog =
        ingest_products("SKU,MODELO,VALOR,PROMOÇÃO,VALOR B\nS1,M1,100,80,90\nS2,M2,100,,90");
    let overrides = resolve_code("B", &catalog, &book("B", "VALOR B"));
    assert_eq!(overrides.unit_price(&catalog.products[0]), dec(80, 0));
    assert_eq!(overrides.unit_price(&catalog.products[1]), dec(90, 0));
}

#[test]
fn unit_price_without_overrides_is_catalog_price() {
    let catalog = ingest_products("SKU,MODELO,VALOR\nS1,M1,100");
    let overrides = PriceOverrides::default();
    assert_eq!(overrides.unit_price(&catalog.products[0]), dec(100, 0));
}
