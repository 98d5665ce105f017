// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Table definitions for the legacy `system-smartpro` schema.
//!
//! These tables are read-only from this crate's point of view. They are
//! not created by any migration and only declare the columns the pipeline
//! reads.

diesel::table! {
    ss_user (id) {
        id -> BigInt,
        id_key -> Nullable<Text>,
        name -> Nullable<Text>,
        email -> Nullable<Text>,
        jabatan -> Nullable<Text>,
        created_at -> Nullable<Timestamp>,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    ss_project_management (pr_project_code) {
        pr_project_code -> Text,
        pr_project_name -> Nullable<Text>,
        pr_customer_name -> Nullable<Text>,
        pr_pic_project -> Nullable<BigInt>,
        pr_created_by -> Nullable<Text>,
        pr_created_date -> Nullable<Timestamp>,
        pr_last_update -> Nullable<Timestamp>,
        pr_status -> Nullable<Text>,
        pr_members -> Nullable<Text>,
    }
}

diesel::table! {
    ss_category_clocking (cc_id) {
        cc_id -> BigInt,
        cc_definition -> Nullable<Text>,
        cc_productive -> Nullable<Integer>,
        cc_billable -> Nullable<Integer>,
        cc_used -> Nullable<Integer>,
        cc_direct -> Nullable<Integer>,
    }
}

diesel::table! {
    ss_daily_activity (da_id) {
        da_id -> BigInt,
        da_project_code -> Nullable<Text>,
        da_date -> Nullable<Date>,
        da_priority -> Nullable<Text>,
        da_start_tm -> Nullable<Timestamp>,
        da_end_tm -> Nullable<Timestamp>,
        da_created_by -> Nullable<Text>,
        da_created_date -> Nullable<Timestamp>,
        da_updated_date -> Nullable<Timestamp>,
        da_activity -> Nullable<Text>,
        da_keterangan -> Nullable<Text>,
        da_duration -> Nullable<Integer>,
        da_data -> Nullable<Text>,
        da_clocking -> Nullable<Text>,
    }
}
